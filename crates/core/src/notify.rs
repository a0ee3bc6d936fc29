//! Best-effort desktop notification capability.
//!
//! Notifications are a side effect of the login poller's terminal
//! transitions; delivery failures must never affect the state machine, so
//! the trait is infallible and implementations swallow errors.

use std::process::{Command, Stdio};

use tracing::debug;

pub trait Notify: Send + Sync {
	/// Delivers a notification, best effort.
	fn notify(&self, title: &str, message: &str);
}

/// Shells out to `terminal-notifier`, falling back to `osascript`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notify for DesktopNotifier {
	fn notify(&self, title: &str, message: &str) {
		let delivered = Command::new("terminal-notifier")
			.args(["-title", title, "-message", message, "-sound", "default"])
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.status()
			.map(|status| status.success())
			.unwrap_or(false);

		if delivered {
			return;
		}

		let script = format!(r#"display notification "{message}" with title "{title}""#);
		let fallback = Command::new("osascript")
			.args(["-e", &script])
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.status();
		if fallback.is_err() {
			debug!(target = "onboard.login", title, "no notification backend available");
		}
	}
}

/// Discards notifications; for tests and headless environments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notify for NoopNotifier {
	fn notify(&self, _title: &str, _message: &str) {}
}
