//! Login watch step: run the polling loop to a terminal state.
//!
//! Default mode inspects profile artifacts on disk, which stays out of the
//! way of the interactive browser holding the profile. `--live` instead
//! attaches to the running browser and probes a page directly.

use std::time::Duration;

use colored::Colorize;
use onboard_core::login::{LiveProbe, ProfileArtifacts};
use onboard_core::notify::DesktopNotifier;
use onboard_core::session::Page;
use onboard_core::{
	BrowserSession, DataDir, LoginPoller, PollOutcome, PollerConfig, Result, SessionManager, SetupError,
	StatusStore, StatusUpdate,
};

pub struct WatchArgs {
	pub profile: String,
	pub live: bool,
	pub interval_secs: u64,
	pub max_attempts: u32,
	pub redirect: String,
	pub home_url: String,
}

pub async fn run(data: &DataDir, args: WatchArgs) -> Result<()> {
	let store = StatusStore::open(data);
	let notifier = DesktopNotifier;

	let app_title = store
		.read()
		.app
		.map(|app| app.name)
		.unwrap_or_else(|| "Setup".to_string());
	let config = PollerConfig {
		interval: Duration::from_secs(args.interval_secs),
		max_attempts: args.max_attempts,
		redirect: args.redirect,
		app_title,
		..Default::default()
	};

	println!(
		"{} Watching for login ({} checks, every {}s)...",
		"→".cyan(),
		args.max_attempts,
		args.interval_secs
	);

	let outcome = if args.live {
		// A failure to reach the browser prevents the watch from starting;
		// it must land in the status document so the polling UI renders it.
		let (session, page) = match acquire_live(data).await {
			Ok(acquired) => acquired,
			Err(err) => {
				eprintln!("{} {err}", "✗".red());
				store.write(StatusUpdate::failure(err.to_string(), "Could not start login watch"))?;
				return Err(err);
			}
		};
		let poller = LoginPoller::new(&store, LiveProbe::new(page, args.home_url), &notifier, config);
		let outcome = poller.run().await?;
		session.close().await;
		outcome
	} else {
		let evidence = ProfileArtifacts::new(data.profiles_dir().join(&args.profile));
		LoginPoller::new(&store, evidence, &notifier, config).run().await?
	};

	match outcome {
		PollOutcome::LoggedIn => {
			println!("{} Login detected; setup complete", "✓".green());
			Ok(())
		}
		PollOutcome::TimedOut => {
			eprintln!("{} No login detected within the attempt budget", "✗".red());
			Err(SetupError::LoginTimeout)
		}
	}
}

async fn acquire_live(data: &DataDir) -> Result<(BrowserSession, Page)> {
	let manager = SessionManager::open(data);
	let session = manager.attach_discovered().await?;
	let page = session.page().await?;
	Ok((session, page))
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	#[tokio::test]
	async fn live_start_failure_is_recorded_in_status_document() {
		let tmp = TempDir::new().expect("temp dir should be created");
		let data = DataDir::at(tmp.path().to_path_buf());

		// No browser with a debugging endpoint exists here, so the live watch
		// cannot start.
		let err = run(&data, WatchArgs {
			profile: "default".to_string(),
			live: true,
			interval_secs: 0,
			max_attempts: 1,
			redirect: "/".to_string(),
			home_url: "https://x.com/home".to_string(),
		})
		.await
		.expect_err("live watch should fail to start");
		assert!(
			matches!(err, SetupError::NoRunningBrowser | SetupError::Connection(_)),
			"got {err:?}"
		);

		let status = StatusStore::open(&data).read();
		assert!(status.error.is_some(), "failure should be recorded, got {status:?}");
		assert_eq!(status.message, "Could not start login watch");
	}
}
