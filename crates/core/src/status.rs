//! Persisted, mergeable setup status document.
//!
//! The status document is the sole coordination channel between the dashboard
//! server, the CLI step scripts, and the browser-side polling UI. Updates are
//! partial merges: a field absent from an update keeps its stored value, and
//! log lines append rather than replace. Writes go through a sibling temp
//! file and an atomic rename so a concurrent reader never observes a
//! half-written document. There is no ordering guarantee beyond
//! last-write-wins; every write re-reads current state before merging.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::paths::DataDir;

/// Descriptor of the app being installed, rendered by the setup UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptor {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub features: Vec<String>,
}

/// The persisted coordination document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupStatus {
	pub step: u8,
	pub message: String,
	pub progress: u8,
	pub complete: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(default)]
	pub logs: Vec<String>,
	#[serde(default)]
	pub waiting_for_login: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app: Option<AppDescriptor>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect: Option<String>,
}

impl Default for SetupStatus {
	fn default() -> Self {
		Self {
			step: 0,
			message: "Waiting for setup to start...".to_string(),
			progress: 0,
			complete: false,
			error: None,
			logs: Vec::new(),
			waiting_for_login: false,
			app: None,
			redirect: None,
		}
	}
}

/// Deserializes a field that was present in the update, keeping JSON `null`
/// distinguishable from an absent field.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	T::deserialize(deserializer).map(Some)
}

/// Partial update merged field-by-field onto the stored document.
///
/// `error` and `redirect` distinguish "absent" (keep stored value) from
/// "present but null" (clear the stored value). `log` appends one line;
/// `logs` replaces the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub step: Option<u8>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub progress: Option<u8>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub complete: Option<bool>,
	#[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
	pub error: Option<Option<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub waiting_for_login: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app: Option<AppDescriptor>,
	#[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
	pub redirect: Option<Option<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub log: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logs: Option<Vec<String>>,
}

impl StatusUpdate {
	/// Update that appends one log line and changes nothing else.
	pub fn log(line: impl Into<String>) -> Self {
		Self {
			log: Some(line.into()),
			..Default::default()
		}
	}

	/// Update that records a terminal failure.
	pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: Some(Some(error.into())),
			message: Some(message.into()),
			..Default::default()
		}
	}
}

/// Merges an update onto the current document.
fn merge(mut current: SetupStatus, update: StatusUpdate) -> SetupStatus {
	if let Some(step) = update.step {
		current.step = step;
	}
	if let Some(message) = update.message {
		current.message = message;
	}
	if let Some(progress) = update.progress {
		current.progress = progress;
	}
	if let Some(complete) = update.complete {
		current.complete = complete;
	}
	if let Some(error) = update.error {
		current.error = error;
	}
	if let Some(waiting) = update.waiting_for_login {
		current.waiting_for_login = waiting;
	}
	if let Some(app) = update.app {
		current.app = Some(app);
	}
	if let Some(redirect) = update.redirect {
		current.redirect = redirect;
	}
	if let Some(logs) = update.logs {
		current.logs = logs;
	}
	if let Some(line) = update.log {
		current.logs.push(line);
	}
	current
}

/// File-backed store for the setup status document.
#[derive(Debug, Clone)]
pub struct StatusStore {
	path: PathBuf,
}

impl StatusStore {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Store at the deployment's well-known status document path.
	pub fn open(data: &DataDir) -> Self {
		Self::new(data.status_file())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Returns the current document. A missing or corrupt file yields the
	/// zero-value default; this never fails.
	pub fn read(&self) -> SetupStatus {
		match fs::read_to_string(&self.path) {
			Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
				warn!(
					target = "onboard.status",
					path = %self.path.display(),
					error = %err,
					"status document unreadable; falling back to defaults"
				);
				SetupStatus::default()
			}),
			Err(_) => SetupStatus::default(),
		}
	}

	/// Merges `update` onto the current document and persists the result
	/// atomically. Re-reads before merging so repeated appends from one
	/// writer stay safe without a prior read.
	pub fn write(&self, update: StatusUpdate) -> Result<SetupStatus> {
		let merged = merge(self.read(), update);
		self.persist(&merged)?;
		debug!(
			target = "onboard.status",
			step = merged.step,
			progress = merged.progress,
			complete = merged.complete,
			"status document updated"
		);
		Ok(merged)
	}

	/// Appends a log line, merging nothing else.
	pub fn append_log(&self, line: impl Into<String>) -> Result<SetupStatus> {
		self.write(StatusUpdate::log(line))
	}

	/// Replaces the document with the zero-value default.
	pub fn reset(&self) -> Result<SetupStatus> {
		let status = SetupStatus::default();
		self.persist(&status)?;
		Ok(status)
	}

	fn persist(&self, status: &SetupStatus) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(status)?;
		// Write-then-rename keeps the document whole for concurrent readers.
		let tmp = self.path.with_extension(format!("tmp.{}", std::process::id()));
		fs::write(&tmp, json)?;
		fs::rename(&tmp, &self.path)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn store() -> (TempDir, StatusStore) {
		let tmp = TempDir::new().expect("temp dir should be created");
		let store = StatusStore::new(tmp.path().join("setup-status.json"));
		(tmp, store)
	}

	#[test]
	fn read_without_prior_write_returns_defaults() {
		let (_tmp, store) = store();
		let status = store.read();
		assert_eq!(status.step, 0);
		assert_eq!(status.progress, 0);
		assert!(!status.complete);
		assert_eq!(status.message, "Waiting for setup to start...");
		assert!(status.logs.is_empty());
	}

	#[test]
	fn read_of_corrupt_document_returns_defaults() {
		let (_tmp, store) = store();
		fs::write(store.path(), "{not json").expect("corrupt file should be written");
		assert_eq!(store.read(), SetupStatus::default());
	}

	#[test]
	fn write_merges_partially_and_keeps_omitted_fields() {
		let (_tmp, store) = store();
		store
			.write(StatusUpdate {
				step: Some(2),
				message: Some("Installing...".into()),
				progress: Some(40),
				..Default::default()
			})
			.expect("write should succeed");

		let status = store
			.write(StatusUpdate {
				progress: Some(60),
				..Default::default()
			})
			.expect("write should succeed");

		assert_eq!(status.step, 2);
		assert_eq!(status.message, "Installing...");
		assert_eq!(status.progress, 60);
	}

	#[test]
	fn logs_concatenate_in_call_order_across_interleaved_writes() {
		let (_tmp, store) = store();
		store.append_log("→ started").expect("append should succeed");
		store
			.write(StatusUpdate {
				step: Some(1),
				progress: Some(25),
				..Default::default()
			})
			.expect("write should succeed");
		store.append_log("→ browser launched").expect("append should succeed");
		let status = store
			.write(StatusUpdate {
				progress: Some(50),
				log: Some("→ waiting".into()),
				..Default::default()
			})
			.expect("write should succeed");

		assert_eq!(status.logs, vec!["→ started", "→ browser launched", "→ waiting"]);
	}

	#[test]
	fn explicit_logs_list_replaces_wholesale() {
		let (_tmp, store) = store();
		store.append_log("old line").expect("append should succeed");
		let status = store
			.write(StatusUpdate {
				logs: Some(vec!["fresh".into()]),
				..Default::default()
			})
			.expect("write should succeed");
		assert_eq!(status.logs, vec!["fresh"]);
	}

	#[test]
	fn present_null_clears_while_absent_keeps() {
		let (_tmp, store) = store();
		store
			.write(StatusUpdate::failure("Login timeout", "Login timeout - please restart setup"))
			.expect("write should succeed");
		assert_eq!(store.read().error.as_deref(), Some("Login timeout"));

		// Absent field keeps the stored error.
		let update: StatusUpdate = serde_json::from_str(r#"{"progress": 10}"#).expect("update should parse");
		assert_eq!(store.write(update).expect("write should succeed").error.as_deref(), Some("Login timeout"));

		// Present null clears it.
		let update: StatusUpdate = serde_json::from_str(r#"{"error": null}"#).expect("update should parse");
		assert_eq!(store.write(update).expect("write should succeed").error, None);
	}

	#[test]
	fn reset_returns_to_zero_value_defaults() {
		let (_tmp, store) = store();
		store
			.write(StatusUpdate {
				step: Some(4),
				complete: Some(true),
				log: Some("done".into()),
				..Default::default()
			})
			.expect("write should succeed");

		let status = store.reset().expect("reset should succeed");
		assert_eq!(status, SetupStatus::default());
		assert_eq!(store.read(), SetupStatus::default());
	}

	#[test]
	fn two_post_scenario_reaches_terminal_record() {
		let (_tmp, store) = store();

		let first: StatusUpdate = serde_json::from_str(r#"{"log":"→ started"}"#).expect("update should parse");
		let status = store.write(first).expect("write should succeed");
		assert_eq!(status.logs, vec!["→ started"]);

		let second: StatusUpdate = serde_json::from_str(
			r#"{"log":"✓ done","step":4,"progress":100,"complete":true,"redirect":"/x"}"#,
		)
		.expect("update should parse");
		let status = store.write(second).expect("write should succeed");

		assert_eq!(status.step, 4);
		assert_eq!(status.progress, 100);
		assert!(status.complete);
		assert_eq!(status.redirect.as_deref(), Some("/x"));
		assert_eq!(status.logs, vec!["→ started", "✓ done"]);
	}

	#[test]
	fn app_descriptor_round_trips_in_camel_case() {
		let (_tmp, store) = store();
		let update: StatusUpdate = serde_json::from_str(
			r#"{"app":{"name":"Reply Bot","description":"Automated replies","features":["scraping","posting"]}}"#,
		)
		.expect("update should parse");
		let status = store.write(update).expect("write should succeed");
		let app = status.app.expect("app descriptor should be stored");
		assert_eq!(app.name, "Reply Bot");
		assert_eq!(app.features.len(), 2);

		let raw = fs::read_to_string(store.path()).expect("document should exist");
		assert!(raw.contains("\"waitingForLogin\""), "document was {raw}");
	}

	#[test]
	fn persist_leaves_no_temp_file_behind() {
		let (tmp, store) = store();
		store.append_log("line").expect("append should succeed");
		let leftovers: Vec<_> = fs::read_dir(tmp.path())
			.expect("dir should be listable")
			.filter_map(|e| e.ok())
			.filter(|e| e.file_name().to_string_lossy().contains("tmp"))
			.collect();
		assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
	}
}
