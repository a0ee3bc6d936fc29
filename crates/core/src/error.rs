//! Error taxonomy for session acquisition and setup coordination.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

#[derive(Debug, Error)]
pub enum SetupError {
	/// Discovery found nothing to attach to. Recoverable by the user opening
	/// a browser, not a network fault.
	#[error("no running browser with a debugging endpoint found")]
	NoRunningBrowser,

	/// An attach attempt against a known target failed.
	#[error("failed to connect to browser: {0}")]
	Connection(String),

	/// Spawning a local profile-bound browser failed.
	#[error("failed to launch browser: {0}")]
	ProfileLaunch(String),

	/// A single login-evidence check could not be evaluated. Absorbed by the
	/// polling loop, never surfaced to callers.
	#[error("evidence check failed: {0}")]
	Evidence(String),

	/// The login poller exhausted its attempt budget.
	#[error("login was not detected within the attempt budget")]
	LoginTimeout,

	#[error("CDP error: {0}")]
	Cdp(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for SetupError {
	fn from(err: chromiumoxide::error::CdpError) -> Self {
		SetupError::Cdp(err.to_string())
	}
}
