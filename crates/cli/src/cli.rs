use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_HOME_URL: &str = onboard_core::login::DEFAULT_HOME_URL;

#[derive(Parser, Debug)]
#[command(name = "onboard")]
#[command(about = "Guided browser setup - session launch, login detection, coordination")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Data directory root (defaults to ~/.onboard)
	#[arg(long, global = true, value_name = "DIR")]
	pub data_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Launch a browser bound to a named persistent profile
	Launch {
		/// Profile name
		#[arg(default_value = "default")]
		profile: String,

		/// Run without a visible window
		#[arg(long)]
		headless: bool,

		/// Proxy server URL for the launched browser
		#[arg(long, value_name = "URL")]
		proxy: Option<String>,

		/// Page to open after launch
		#[arg(long, default_value = DEFAULT_HOME_URL)]
		home_url: String,
	},

	/// Attach to an already running browser over its debugging endpoint
	Connect {
		/// Debugging port; discovered from listening sockets when omitted
		port: Option<u16>,

		/// Page to open after attaching
		#[arg(long, default_value = DEFAULT_HOME_URL)]
		home_url: String,
	},

	/// List existing browser profiles
	List,

	/// Delete a browser profile and its on-disk state
	Delete { profile: String },

	/// Print the current setup status document
	Status,

	/// Poll for a completed login and drive the status document to a
	/// terminal state
	WatchLogin {
		/// Profile whose on-disk artifacts are inspected
		#[arg(default_value = "default")]
		profile: String,

		/// Probe a live browser page instead of profile artifacts
		#[arg(long)]
		live: bool,

		/// Seconds between evidence checks
		#[arg(long, default_value = "5")]
		interval_secs: u64,

		/// Attempt budget before giving up
		#[arg(long, default_value = "60")]
		max_attempts: u32,

		/// Redirect path written on success
		#[arg(long, default_value = "/")]
		redirect: String,

		/// Page probed in live mode
		#[arg(long, default_value = DEFAULT_HOME_URL)]
		home_url: String,
	},

	/// Reset the setup status document to its initial state
	Reset,

	/// Serve the setup coordination HTTP endpoint
	Serve {
		#[arg(long, default_value = "3210")]
		port: u16,
	},
}
