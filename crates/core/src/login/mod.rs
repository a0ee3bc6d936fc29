//! Bounded polling state machine for asynchronous login detection.
//!
//! `Idle -> Polling -> {LoggedIn, TimedOut}`. Each tick evaluates one
//! evidence check; evidence errors count as a negative tick and never abort
//! the loop. Progress is reported through the shared status document, and
//! terminal transitions fire best-effort notifications. The attempt budget
//! is the only cancellation mechanism.

mod evidence;

use std::time::Duration;

use tracing::{debug, info, warn};

pub use evidence::{DEFAULT_HOME_URL, DEFAULT_LOGIN_MARKERS, LiveProbe, LoginEvidence, ProfileArtifacts};

use crate::error::Result;
use crate::notify::Notify;
use crate::status::{StatusStore, StatusUpdate};

/// Ticks between "still waiting" log lines.
const LIVENESS_EVERY: u32 = 6;
/// Step value written on success; the workflow's final step.
const FINAL_STEP: u8 = 4;
/// Progress written with the intermediate success record, before the UI
/// observes the terminal one.
const NEAR_COMPLETE_PROGRESS: u8 = 90;

#[derive(Debug, Clone)]
pub struct PollerConfig {
	/// Fixed interval between evidence checks.
	pub interval: Duration,
	/// Attempt budget; exhausting it is the TimedOut terminal state.
	pub max_attempts: u32,
	/// Pause between the intermediate and terminal success records, so the
	/// polling UI can observe the intermediate state.
	pub success_delay: Duration,
	/// Destination path written alongside the terminal success record.
	pub redirect: String,
	/// Title used for notifications and the ready message.
	pub app_title: String,
}

impl Default for PollerConfig {
	fn default() -> Self {
		Self {
			interval: Duration::from_secs(5),
			max_attempts: 60,
			success_delay: Duration::from_secs(1),
			redirect: "/".to_string(),
			app_title: "Setup".to_string(),
		}
	}
}

/// Terminal state of a polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
	LoggedIn,
	TimedOut,
}

pub struct LoginPoller<'a, E> {
	store: &'a StatusStore,
	evidence: E,
	notifier: &'a dyn Notify,
	config: PollerConfig,
}

impl<'a, E: LoginEvidence> LoginPoller<'a, E> {
	pub fn new(store: &'a StatusStore, evidence: E, notifier: &'a dyn Notify, config: PollerConfig) -> Self {
		Self {
			store,
			evidence,
			notifier,
			config,
		}
	}

	/// Runs the loop to a terminal state. Only status-document I/O failures
	/// propagate; evidence failures are absorbed per tick.
	pub async fn run(mut self) -> Result<PollOutcome> {
		self.store.write(StatusUpdate {
			waiting_for_login: Some(true),
			message: Some("Log in using the browser window...".to_string()),
			log: Some("→ Waiting for login...".to_string()),
			..Default::default()
		})?;

		let mut attempts = 0u32;
		while attempts < self.config.max_attempts {
			attempts += 1;

			let logged_in = match self.evidence.check().await {
				Ok(logged_in) => logged_in,
				Err(err) => {
					debug!(
						target = "onboard.login",
						attempt = attempts,
						error = %err,
						"evidence check failed; counting as a negative tick"
					);
					false
				}
			};

			if logged_in {
				info!(target = "onboard.login", attempt = attempts, "login detected");
				self.finish().await?;
				return Ok(PollOutcome::LoggedIn);
			}

			tokio::time::sleep(self.config.interval).await;

			if attempts % LIVENESS_EVERY == 0 {
				let minutes = u64::from(attempts) * self.config.interval.as_secs() / 60;
				self.store
					.append_log(format!("! Still waiting for login... ({minutes}m)"))?;
			}
		}

		warn!(
			target = "onboard.login",
			attempts = self.config.max_attempts,
			"attempt budget exhausted without detecting login"
		);
		self.store.write(StatusUpdate {
			waiting_for_login: Some(false),
			error: Some(Some("Login timeout".to_string())),
			message: Some("Login timeout - please restart setup".to_string()),
			log: Some("✗ Login timeout - please try again".to_string()),
			..Default::default()
		})?;
		Ok(PollOutcome::TimedOut)
	}

	async fn finish(&self) -> Result<()> {
		self.store.write(StatusUpdate {
			waiting_for_login: Some(false),
			step: Some(FINAL_STEP),
			progress: Some(NEAR_COMPLETE_PROGRESS),
			message: Some("Login successful! Completing setup...".to_string()),
			log: Some("✓ Login detected!".to_string()),
			..Default::default()
		})?;
		self.notifier.notify(&self.config.app_title, "Login successful!");

		tokio::time::sleep(self.config.success_delay).await;

		self.store.write(StatusUpdate {
			step: Some(FINAL_STEP),
			progress: Some(100),
			complete: Some(true),
			redirect: Some(Some(self.config.redirect.clone())),
			message: Some(format!("{} is ready!", self.config.app_title)),
			log: Some("✓ Setup complete!".to_string()),
			..Default::default()
		})?;
		self.notifier
			.notify(&self.config.app_title, "Setup complete! Opening dashboard...");
		Ok(())
	}
}
