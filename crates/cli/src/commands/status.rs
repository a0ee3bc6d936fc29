//! Status inspection and reset steps.

use colored::Colorize;
use onboard_core::discovery::SessionDiscovery;
use onboard_core::{DataDir, Result, StatusStore};

pub fn show(data: &DataDir) -> Result<()> {
	let status = StatusStore::open(data).read();
	println!("{}", serde_json::to_string_pretty(&status)?);

	let ports = SessionDiscovery::default().find_debug_ports();
	if !ports.is_empty() {
		let ports: Vec<String> = ports.iter().map(u16::to_string).collect();
		println!("Running browser debugging ports: {}", ports.join(", "));
	}
	Ok(())
}

pub fn reset(data: &DataDir) -> Result<()> {
	StatusStore::open(data).reset()?;
	println!("{} Setup status reset", "✓".green());
	Ok(())
}
