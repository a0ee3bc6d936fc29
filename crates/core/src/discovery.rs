//! Discovery of externally controlled browsers via OS socket listings.
//!
//! Managed anti-detect browsers expose a DevTools debugging port when opened
//! from their GUI. Scanning the listening sockets for the engine's process
//! name lets the system attach to a browser the user opened manually, with no
//! API key or configuration. The discovery command being absent or failing is
//! treated as "no candidates", never an error.

use std::process::Command;

use regex_lite::Regex;
use tracing::debug;

/// Process-name signature of the managed browser engine's sockets.
pub const DEFAULT_PROCESS_SIGNATURE: &str = "SunBrow";

#[derive(Debug, Clone)]
pub struct SessionDiscovery {
	signature: String,
}

impl Default for SessionDiscovery {
	fn default() -> Self {
		Self::new(DEFAULT_PROCESS_SIGNATURE)
	}
}

impl SessionDiscovery {
	pub fn new(signature: impl Into<String>) -> Self {
		Self {
			signature: signature.into(),
		}
	}

	/// Returns the ordered list of debugging ports owned by matching
	/// processes; empty when nothing matches or `lsof` is unavailable.
	pub fn find_debug_ports(&self) -> Vec<u16> {
		let output = match Command::new("lsof").args(["-i", "-P", "-n"]).output() {
			Ok(output) => output,
			Err(err) => {
				debug!(target = "onboard.discovery", error = %err, "lsof unavailable; no candidates");
				return Vec::new();
			}
		};

		// lsof exits non-zero when some descriptors cannot be inspected;
		// whatever made it to stdout is still usable.
		let ports = parse_listen_ports(&String::from_utf8_lossy(&output.stdout), &self.signature);
		debug!(
			target = "onboard.discovery",
			signature = %self.signature,
			candidates = ports.len(),
			"socket scan finished"
		);
		ports
	}
}

/// Extracts listening ports from `lsof -i -P -n` output, filtered by process
/// signature. De-duplicates while preserving first-seen order.
pub fn parse_listen_ports(output: &str, signature: &str) -> Vec<u16> {
	let pattern = Regex::new(r":(\d+)\s+\(LISTEN\)").expect("port pattern should compile");
	let mut ports = Vec::new();

	for line in output.lines() {
		if !line.contains(signature) || !line.contains("(LISTEN)") {
			continue;
		}
		if let Some(captures) = pattern.captures(line)
			&& let Ok(port) = captures[1].parse::<u16>()
			&& !ports.contains(&port)
		{
			ports.push(port);
		}
	}

	ports
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "\
SunBrowse 17930 claudio   63u  IPv4 0x1a2b3c      0t0  TCP 127.0.0.1:54689 (LISTEN)
SunBrowse 17930 claudio   64u  IPv4 0x1a2b3d      0t0  TCP 127.0.0.1:54689 (LISTEN)
SunBrowse 17931 claudio   65u  IPv4 0x1a2b3e      0t0  TCP 127.0.0.1:54702 (LISTEN)
Safari     1204 claudio   20u  IPv4 0x9f8e7d      0t0  TCP 127.0.0.1:52000 (LISTEN)
SunBrowse 17930 claudio   70u  IPv4 0x1a2b3f      0t0  TCP 127.0.0.1:54690->127.0.0.1:443 (ESTABLISHED)";

	#[test]
	fn extracts_matching_listen_ports_in_order() {
		assert_eq!(parse_listen_ports(SAMPLE, "SunBrow"), vec![54689, 54702]);
	}

	#[test]
	fn ignores_non_matching_processes() {
		assert_eq!(parse_listen_ports(SAMPLE, "Helium"), Vec::<u16>::new());
	}

	#[test]
	fn ignores_established_connections() {
		let ports = parse_listen_ports(SAMPLE, "SunBrow");
		assert!(!ports.contains(&54690));
	}

	#[test]
	fn empty_output_yields_no_candidates() {
		assert_eq!(parse_listen_ports("", "SunBrow"), Vec::<u16>::new());
	}

	#[test]
	fn discovery_on_empty_environment_returns_empty_not_error() {
		// The signature cannot match any real process name.
		let discovery = SessionDiscovery::new("no-such-process-signature-xyz");
		assert_eq!(discovery.find_debug_ports(), Vec::<u16>::new());
	}
}
