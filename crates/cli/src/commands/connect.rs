//! Connect step: attach to an externally running browser.
//!
//! The browser outlives this command; releasing the session only drops the
//! debugging connection.

use colored::Colorize;
use onboard_core::{DataDir, Result, SessionManager, SetupError, StatusStore, StatusUpdate};

pub async fn run(data: &DataDir, port: Option<u16>, home_url: &str) -> Result<()> {
	let store = StatusStore::open(data);
	let manager = SessionManager::open(data);

	let session = match port {
		Some(port) => {
			println!("{} Connecting to browser on port {port}...", "→".cyan());
			manager.attach_remote(port).await
		}
		None => {
			println!("{} Looking for a running browser...", "→".cyan());
			manager.attach_discovered().await
		}
	};

	let session = match session {
		Ok(session) => session,
		Err(SetupError::NoRunningBrowser) => {
			eprintln!("{} No running browser with a debugging endpoint found.", "✗".red());
			eprintln!("  Start the browser first, or pass an explicit port.");
			store.write(StatusUpdate::failure(
				"No running browser found",
				"Open the browser before connecting",
			))?;
			return Err(SetupError::NoRunningBrowser);
		}
		Err(err) => {
			eprintln!("{} {err}", "✗".red());
			store.write(StatusUpdate::failure(err.to_string(), "Browser connection failed"))?;
			return Err(err);
		}
	};

	let page = session.page().await?;
	page.goto(home_url).await?;

	println!("{} Connected; opened {home_url}", "✓".green());
	super::report_login_state(&page).await?;
	store.append_log("✓ Connected to running browser")?;

	println!("  Press Ctrl-C to disconnect; the browser keeps running.");
	tokio::signal::ctrl_c().await?;

	// Attached mode: the browser keeps running after we let go.
	session.close().await;
	Ok(())
}
