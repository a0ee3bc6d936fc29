//! Tracing setup for the step scripts.
//!
//! Diagnostics go to stderr so stdout stays reserved for the user-facing
//! step output. `RUST_LOG` wins over the verbosity flags when set.

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
