//! Evidence strategies for inferring that an interactive login completed.
//!
//! There is no callback channel out of a human-operated browser, so the
//! poller infers login from either a live navigation probe or passive
//! on-disk profile artifacts. The passive variant is preferred while an
//! interactive browser holds the profile, since most browsers refuse a
//! second concurrent instance against the same profile directory.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;

use crate::error::{Result, SetupError};

/// One polling tick's check. Errors are absorbed by the poller as a single
/// negative tick, never surfaced.
#[async_trait]
pub trait LoginEvidence: Send {
	async fn check(&mut self) -> Result<bool>;
}

/// Default home route of the target site.
pub const DEFAULT_HOME_URL: &str = "https://x.com/home";

/// URL fragments indicating a login or authentication-flow page.
pub const DEFAULT_LOGIN_MARKERS: &[&str] = &["login", "i/flow"];

/// Live probe: navigate a session-owned page to the home route and classify
/// by the URL the site settles on.
pub struct LiveProbe {
	page: Page,
	home_url: String,
	login_markers: Vec<String>,
}

impl LiveProbe {
	pub fn new(page: Page, home_url: impl Into<String>) -> Self {
		Self {
			page,
			home_url: home_url.into(),
			login_markers: DEFAULT_LOGIN_MARKERS.iter().map(|m| m.to_string()).collect(),
		}
	}

	pub fn with_login_markers(mut self, markers: Vec<String>) -> Self {
		self.login_markers = markers;
		self
	}

	/// Logged in when the settled URL carries no login-flow marker.
	pub fn classify<S: AsRef<str>>(url: &str, markers: &[S]) -> bool {
		!markers.iter().any(|marker| url.contains(marker.as_ref()))
	}
}

#[async_trait]
impl LoginEvidence for LiveProbe {
	async fn check(&mut self) -> Result<bool> {
		self.page
			.goto(self.home_url.as_str())
			.await
			.map_err(|e| SetupError::Evidence(format!("navigation failed: {e}")))?;
		let _ = self.page.wait_for_navigation().await;
		let url = self
			.page
			.url()
			.await
			.map_err(|e| SetupError::Evidence(format!("could not read page URL: {e}")))?
			.unwrap_or_default();
		Ok(Self::classify(&url, &self.login_markers))
	}
}

const MIN_COOKIE_BYTES: u64 = 10_000;
const STATE_RECENCY: Duration = Duration::from_secs(5 * 60);

/// Passive evidence: profile directory artifacts inspected without touching
/// the live browser. An authenticated profile accumulates cookie state, and
/// the browser's internal state file is rewritten at the end of an
/// interactive session.
pub struct ProfileArtifacts {
	profile_dir: PathBuf,
	min_cookie_bytes: u64,
	state_recency: Duration,
}

impl ProfileArtifacts {
	pub fn new(profile_dir: PathBuf) -> Self {
		Self {
			profile_dir,
			min_cookie_bytes: MIN_COOKIE_BYTES,
			state_recency: STATE_RECENCY,
		}
	}

	#[cfg(test)]
	fn with_thresholds(mut self, min_cookie_bytes: u64, state_recency: Duration) -> Self {
		self.min_cookie_bytes = min_cookie_bytes;
		self.state_recency = state_recency;
		self
	}

	/// Cookie store grown past the minimum-size heuristic.
	fn cookies_grown(&self) -> bool {
		for candidate in [
			self.profile_dir.join("Default").join("Cookies"),
			self.profile_dir.join("Cookies"),
		] {
			if let Ok(meta) = fs::metadata(&candidate)
				&& meta.len() > self.min_cookie_bytes
			{
				return true;
			}
		}
		false
	}

	/// `Local State` carrying crypt keys and written recently enough to
	/// indicate a just-completed interactive session.
	fn state_recently_written(&self) -> bool {
		let path = self.profile_dir.join("Local State");
		let Ok(content) = fs::read_to_string(&path) else {
			return false;
		};
		if !content.contains("\"os_crypt\"") || !content.contains("\"encrypted_key\"") {
			return false;
		}
		fs::metadata(&path)
			.and_then(|meta| meta.modified())
			.ok()
			.and_then(|modified| modified.elapsed().ok())
			.is_some_and(|age| age < self.state_recency)
	}
}

#[async_trait]
impl LoginEvidence for ProfileArtifacts {
	async fn check(&mut self) -> Result<bool> {
		if !self.profile_dir.exists() {
			return Ok(false);
		}
		Ok(self.cookies_grown() || self.state_recently_written())
	}
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn markers() -> Vec<String> {
		DEFAULT_LOGIN_MARKERS.iter().map(|m| m.to_string()).collect()
	}

	#[test]
	fn classify_treats_home_url_as_logged_in() {
		assert!(LiveProbe::classify("https://x.com/home", &markers()));
	}

	#[test]
	fn classify_treats_login_routes_as_logged_out() {
		assert!(!LiveProbe::classify("https://x.com/login", &markers()));
		assert!(!LiveProbe::classify("https://x.com/i/flow/login", &markers()));
	}

	#[tokio::test]
	async fn missing_profile_directory_is_negative() {
		let tmp = TempDir::new().expect("temp dir should be created");
		let mut evidence = ProfileArtifacts::new(tmp.path().join("absent"));
		assert!(!evidence.check().await.expect("check should succeed"));
	}

	#[tokio::test]
	async fn large_cookie_store_is_positive() {
		let tmp = TempDir::new().expect("temp dir should be created");
		let default_dir = tmp.path().join("Default");
		fs::create_dir_all(&default_dir).expect("profile layout should be created");
		fs::write(default_dir.join("Cookies"), vec![0u8; 64]).expect("cookie file should be written");

		let mut evidence =
			ProfileArtifacts::new(tmp.path().to_path_buf()).with_thresholds(32, STATE_RECENCY);
		assert!(evidence.check().await.expect("check should succeed"));
	}

	#[tokio::test]
	async fn small_cookie_store_is_negative() {
		let tmp = TempDir::new().expect("temp dir should be created");
		fs::write(tmp.path().join("Cookies"), vec![0u8; 8]).expect("cookie file should be written");

		let mut evidence =
			ProfileArtifacts::new(tmp.path().to_path_buf()).with_thresholds(32, STATE_RECENCY);
		assert!(!evidence.check().await.expect("check should succeed"));
	}

	#[tokio::test]
	async fn fresh_state_file_with_crypt_keys_is_positive() {
		let tmp = TempDir::new().expect("temp dir should be created");
		fs::write(
			tmp.path().join("Local State"),
			r#"{"os_crypt":{"encrypted_key":"abc"}}"#,
		)
		.expect("state file should be written");

		let mut evidence = ProfileArtifacts::new(tmp.path().to_path_buf());
		assert!(evidence.check().await.expect("check should succeed"));
	}

	#[tokio::test]
	async fn state_file_without_crypt_keys_is_negative() {
		let tmp = TempDir::new().expect("temp dir should be created");
		fs::write(tmp.path().join("Local State"), r#"{"browser":{}}"#).expect("state file should be written");

		let mut evidence = ProfileArtifacts::new(tmp.path().to_path_buf());
		assert!(!evidence.check().await.expect("check should succeed"));
	}
}
