//! Launch step: spawn a profile-bound browser and hand it to the user.

use colored::Colorize;
use onboard_core::{
	BrowserSession, DataDir, LaunchOptions, Result, SessionManager, StatusStore, StatusUpdate,
};

pub async fn run(data: &DataDir, profile: &str, headless: bool, proxy: Option<String>, home_url: &str) -> Result<()> {
	let store = StatusStore::open(data);

	match acquire(data, profile, headless, proxy, home_url, &store).await {
		Ok(session) => {
			println!("{} Browser ready at {home_url}", "✓".green());
			let page = session.page().await?;
			super::report_login_state(&page).await?;
			println!("  Log in if needed, then press Ctrl-C to close the browser.");
			store.append_log("✓ Browser launched")?;

			tokio::signal::ctrl_c().await?;
			println!("{} Closing browser...", "→".cyan());
			session.close().await;
			store.append_log("→ Browser closed")?;
			Ok(())
		}
		Err(err) => {
			eprintln!("{} {err}", "✗".red());
			store.write(StatusUpdate::failure(err.to_string(), "Browser launch failed"))?;
			store.append_log(format!("✗ Launch failed: {err}"))?;
			Err(err)
		}
	}
}

async fn acquire(
	data: &DataDir,
	profile: &str,
	headless: bool,
	proxy: Option<String>,
	home_url: &str,
	store: &StatusStore,
) -> Result<BrowserSession> {
	println!("{} Launching browser with profile '{profile}'...", "→".cyan());
	store.write(StatusUpdate {
		message: Some("Launching browser...".to_string()),
		log: Some(format!("→ Launching browser ({profile})...")),
		..Default::default()
	})?;

	let manager = SessionManager::open(data);
	let session = manager.launch_local(profile, &LaunchOptions { headless, proxy }).await?;

	let page = session.page().await?;
	page.goto(home_url).await?;
	Ok(session)
}
