//! Browser session orchestration and setup coordination.
//!
//! This crate owns the coordination problems behind the dashboard's guided
//! setup: a mergeable, file-backed status document shared between independent
//! processes, discovery of externally controlled browsers, a two-mode browser
//! session abstraction with fingerprint masking, and the bounded polling loop
//! that detects a human-performed login.

/// Discovery of externally controlled browsers via OS socket listings.
pub mod discovery;
/// Error taxonomy and crate-wide result alias.
pub mod error;
/// Bounded login-detection polling and its evidence strategies.
pub mod login;
/// Best-effort desktop notification capability.
pub mod notify;
/// Well-known data directory layout.
pub mod paths;
/// Named browser profile directories.
pub mod profile;
/// Two-mode browser session acquisition and lifecycle.
pub mod session;
/// Persisted, mergeable setup status document.
pub mod status;
/// Fingerprint-masking scripts applied to every page.
pub mod stealth;

pub use error::{Result, SetupError};
pub use login::{LoginPoller, PollOutcome, PollerConfig};
pub use paths::DataDir;
pub use profile::ProfileStore;
pub use session::{BrowserSession, LaunchOptions, SessionManager, SessionMode};
pub use status::{SetupStatus, StatusStore, StatusUpdate};
