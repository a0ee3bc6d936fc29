//! CDP endpoint probing over the DevTools `/json/version` route.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SetupError};

/// `/json/version` response subset from the DevTools protocol.
#[derive(Debug, Deserialize)]
pub struct CdpVersionInfo {
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
	#[serde(rename = "Browser")]
	pub browser: Option<String>,
}

/// Resolves debugger metadata from `/json/version` on `port`.
pub async fn fetch_cdp_endpoint(port: u16) -> Result<CdpVersionInfo> {
	let client = reqwest::Client::builder()
		.timeout(Duration::from_millis(400))
		.build()
		.map_err(|e| SetupError::Connection(format!("failed to create HTTP client: {e}")))?;
	let mut last_error = "no response".to_string();

	for url in [
		format!("http://127.0.0.1:{port}/json/version"),
		format!("http://localhost:{port}/json/version"),
		format!("http://[::1]:{port}/json/version"),
	] {
		let response = match client.get(&url).send().await {
			Ok(response) => response,
			Err(err) => {
				last_error = err.to_string();
				continue;
			}
		};

		if !response.status().is_success() {
			last_error = format!("unexpected status {}", response.status());
			continue;
		}

		let info: CdpVersionInfo = response
			.json()
			.await
			.map_err(|e| SetupError::Connection(format!("failed to parse CDP response: {e}")))?;
		return Ok(info);
	}

	Err(SetupError::Connection(format!(
		"no debugging endpoint on port {port}: {last_error}"
	)))
}
