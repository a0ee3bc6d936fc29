mod connect;
mod launch;
mod profile;
mod status;
mod watch_login;

use colored::Colorize;
use onboard_core::login::{DEFAULT_LOGIN_MARKERS, LiveProbe};
use onboard_core::session::Page;
use onboard_core::{DataDir, Result};

use crate::cli::{Cli, Commands};

/// Prints whether the page settled on an authenticated route.
pub(crate) async fn report_login_state(page: &Page) -> Result<()> {
	let _ = page.wait_for_navigation().await;
	let url = page.url().await?.unwrap_or_default();
	if LiveProbe::classify(&url, DEFAULT_LOGIN_MARKERS) {
		println!("{} Logged in ({url})", "✓".green());
	} else {
		println!("{} Not logged in yet ({url})", "!".yellow());
	}
	Ok(())
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let data = match cli.data_dir {
		Some(root) => DataDir::at(root),
		None => DataDir::resolve(),
	};

	match cli.command {
		Commands::Launch { profile, headless, proxy, home_url } => {
			launch::run(&data, &profile, headless, proxy, &home_url).await
		}
		Commands::Connect { port, home_url } => connect::run(&data, port, &home_url).await,
		Commands::List => profile::list(&data),
		Commands::Delete { profile } => profile::delete(&data, &profile),
		Commands::Status => status::show(&data),
		Commands::Reset => status::reset(&data),
		Commands::WatchLogin {
			profile,
			live,
			interval_secs,
			max_attempts,
			redirect,
			home_url,
		} => {
			watch_login::run(&data, watch_login::WatchArgs {
				profile,
				live,
				interval_secs,
				max_attempts,
				redirect,
				home_url,
			})
			.await
		}
		Commands::Serve { port } => crate::server::serve(&data, port).await,
	}
}
