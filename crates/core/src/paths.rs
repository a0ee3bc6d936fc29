//! Well-known data directory shared by the dashboard and the step scripts.
//!
//! Everything the setup workflow persists lives under one root: the status
//! document the processes coordinate through, and the browser profile
//! directories. The root is fixed per deployment but overridable for tests.

use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = ".onboard";
const STATUS_FILE: &str = "setup-status.json";
const PROFILES_DIR: &str = "browser-profiles";

/// Resolved data directory layout.
#[derive(Debug, Clone)]
pub struct DataDir {
	root: PathBuf,
}

impl DataDir {
	/// Resolves the default per-user data directory under the home directory.
	pub fn resolve() -> Self {
		let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
		Self {
			root: home.join(DATA_DIR_NAME),
		}
	}

	/// Uses an explicit root instead of the per-user default.
	pub fn at(root: PathBuf) -> Self {
		Self { root }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Path of the shared setup status document.
	pub fn status_file(&self) -> PathBuf {
		self.root.join(STATUS_FILE)
	}

	/// Root directory holding one subdirectory per named browser profile.
	pub fn profiles_dir(&self) -> PathBuf {
		self.root.join(PROFILES_DIR)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layout_is_anchored_at_root() {
		let data = DataDir::at(PathBuf::from("/tmp/onboard-test"));
		assert_eq!(data.status_file(), PathBuf::from("/tmp/onboard-test/setup-status.json"));
		assert_eq!(data.profiles_dir(), PathBuf::from("/tmp/onboard-test/browser-profiles"));
	}

	#[test]
	fn resolve_uses_hidden_home_directory() {
		let data = DataDir::resolve();
		assert!(data.root().ends_with(".onboard"), "root was {}", data.root().display());
	}
}
