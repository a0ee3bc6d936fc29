//! Named browser profile directories.
//!
//! A profile is a durable directory holding one browser's persistent state
//! (cookies, local storage, preferences). Directory presence is the sole
//! existence signal; internal structure is browser-defined and only inspected
//! heuristically by the passive login evidence. A profile directory is a
//! single-writer resource: callers must not bind two live launched sessions
//! to the same profile.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::paths::DataDir;

#[derive(Debug, Clone)]
pub struct ProfileStore {
	root: PathBuf,
}

impl ProfileStore {
	pub fn new(root: PathBuf) -> Self {
		Self { root }
	}

	/// Store at the deployment's well-known profiles root.
	pub fn open(data: &DataDir) -> Self {
		Self::new(data.profiles_dir())
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Path of a named profile; the directory may not exist yet.
	pub fn path(&self, name: &str) -> PathBuf {
		self.root.join(name)
	}

	/// Returns the profile directory, creating it on first use.
	pub fn ensure(&self, name: &str) -> Result<PathBuf> {
		let path = self.path(name);
		if !path.exists() {
			fs::create_dir_all(&path)?;
			info!(target = "onboard.session", profile = name, path = %path.display(), "created browser profile");
		}
		Ok(path)
	}

	/// Names of all existing profiles, sorted.
	pub fn list(&self) -> Vec<String> {
		let Ok(entries) = fs::read_dir(&self.root) else {
			return Vec::new();
		};
		let mut names: Vec<String> = entries
			.filter_map(|entry| entry.ok())
			.filter(|entry| entry.path().is_dir())
			.map(|entry| entry.file_name().to_string_lossy().to_string())
			.collect();
		names.sort();
		names
	}

	/// Removes a profile directory. Returns false when it did not exist.
	/// Deleting a profile bound to a live launched session is the caller's
	/// responsibility to prevent.
	pub fn delete(&self, name: &str) -> Result<bool> {
		match fs::remove_dir_all(self.path(name)) {
			Ok(()) => {
				info!(target = "onboard.session", profile = name, "deleted browser profile");
				Ok(true)
			}
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
			Err(err) => Err(err.into()),
		}
	}
}
