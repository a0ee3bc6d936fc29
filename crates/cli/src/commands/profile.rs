//! Profile listing and deletion steps.

use colored::Colorize;
use onboard_core::{DataDir, ProfileStore, Result};

pub fn list(data: &DataDir) -> Result<()> {
	let profiles = ProfileStore::open(data).list();
	if profiles.is_empty() {
		println!("No profiles yet.");
		return Ok(());
	}
	for name in profiles {
		println!("{name}");
	}
	Ok(())
}

pub fn delete(data: &DataDir, name: &str) -> Result<()> {
	if ProfileStore::open(data).delete(name)? {
		println!("{} Deleted profile '{name}'", "✓".green());
	} else {
		println!("No profile named '{name}'.");
	}
	Ok(())
}
