//! Two-mode browser session acquisition and lifecycle.
//!
//! A session is either *attached* (connected to an externally running browser
//! over its debugging endpoint; the browser outlives the handle) or
//! *launched* (a local browser spawned against a named persistent profile;
//! closing the handle terminates it). The mode is an explicit caller choice,
//! never inferred from the environment. Every page obtained through
//! [`BrowserSession::page`] carries the fingerprint-masking script set.

mod cdp_probe;

use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, BrowserConfig, Handler};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

pub use cdp_probe::{CdpVersionInfo, fetch_cdp_endpoint};
pub use chromiumoxide::Page;

use crate::discovery::SessionDiscovery;
use crate::error::{Result, SetupError};
use crate::paths::DataDir;
use crate::profile::ProfileStore;
use crate::stealth;

const VIEWPORT_WIDTH: u32 = 1920;
const VIEWPORT_HEIGHT: u32 = 1080;

/// Launch-mode options.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
	pub headless: bool,
	/// Proxy server URL routed through `--proxy-server`.
	pub proxy: Option<String>,
}

/// How a session was acquired; determines close semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
	/// Connected to an externally running browser on a debugging port.
	Attached { port: u16 },
	/// Spawned locally against a named persistent profile.
	Launched { profile: String },
}

/// In-memory handle to a controllable browser. Owned exclusively by the
/// process that created it; only profile directory contents are shared
/// across process boundaries.
pub struct BrowserSession {
	browser: Browser,
	handler: JoinHandle<()>,
	mode: SessionMode,
}

impl std::fmt::Debug for BrowserSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BrowserSession")
			.field("mode", &self.mode)
			.finish_non_exhaustive()
	}
}

impl BrowserSession {
	pub fn mode(&self) -> &SessionMode {
		&self.mode
	}

	/// Returns the first existing page or creates one, with the masking
	/// script set installed before any navigation the caller performs.
	/// Masking is reapplied on every call; it never persists onto pages
	/// obtained elsewhere.
	pub async fn page(&self) -> Result<Page> {
		let page = match self.browser.pages().await?.into_iter().next() {
			Some(page) => page,
			None => self.browser.new_page("about:blank").await?,
		};
		page.execute(AddScriptToEvaluateOnNewDocumentParams::new(stealth::MASKING_SCRIPT))
			.await?;
		Ok(page)
	}

	/// Releases the session. A launched browser is terminated; an attached
	/// browser keeps running and only the connection is dropped.
	pub async fn close(mut self) {
		if let SessionMode::Launched { ref profile } = self.mode {
			debug!(target = "onboard.session", profile = %profile, "closing launched browser");
			let _ = self.browser.close().await;
			let _ = self.browser.wait().await;
		}
		self.handler.abort();
	}
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
	tokio::spawn(async move {
		while let Some(event) = handler.next().await {
			trace!(target = "onboard.session", ?event, "browser event");
		}
		debug!(target = "onboard.session", "browser event handler exited");
	})
}

/// Acquires sessions in either mode and owns the profile store.
#[derive(Debug, Clone)]
pub struct SessionManager {
	profiles: ProfileStore,
	discovery: SessionDiscovery,
}

impl SessionManager {
	pub fn new(profiles: ProfileStore, discovery: SessionDiscovery) -> Self {
		Self { profiles, discovery }
	}

	/// Manager rooted at the deployment's well-known data directory.
	pub fn open(data: &DataDir) -> Self {
		Self::new(ProfileStore::open(data), SessionDiscovery::default())
	}

	pub fn profiles(&self) -> &ProfileStore {
		&self.profiles
	}

	pub fn discovery(&self) -> &SessionDiscovery {
		&self.discovery
	}

	/// Connects to a browser already listening for remote control on `port`,
	/// reusing its existing browsing context.
	pub async fn attach_remote(&self, port: u16) -> Result<BrowserSession> {
		let info = fetch_cdp_endpoint(port).await?;
		debug!(
			target = "onboard.session",
			port,
			browser = info.browser.as_deref().unwrap_or("unknown"),
			"attaching over debugging endpoint"
		);

		let (browser, handler) = Browser::connect(info.web_socket_debugger_url)
			.await
			.map_err(|e| SetupError::Connection(format!("handshake on port {port} failed: {e}")))?;

		info!(target = "onboard.session", port, "attached to running browser");
		Ok(BrowserSession {
			browser,
			handler: spawn_handler(handler),
			mode: SessionMode::Attached { port },
		})
	}

	/// Discovers a running browser and attaches to the first candidate.
	/// An empty candidate list is [`SetupError::NoRunningBrowser`], not a
	/// connection fault.
	pub async fn attach_discovered(&self) -> Result<BrowserSession> {
		let ports = self.discovery.find_debug_ports();
		let Some(port) = ports.first().copied() else {
			return Err(SetupError::NoRunningBrowser);
		};
		info!(target = "onboard.session", candidates = ?ports, port, "discovered running browser");
		self.attach_remote(port).await
	}

	/// Spawns a new local browser bound to the named persistent profile,
	/// with automation-concealment launch flags. The returned session owns
	/// the process.
	pub async fn launch_local(&self, profile: &str, options: &LaunchOptions) -> Result<BrowserSession> {
		let profile_dir = self.profiles.ensure(profile)?;

		let mut builder = BrowserConfig::builder()
			.user_data_dir(&profile_dir)
			.viewport(Viewport {
				width: VIEWPORT_WIDTH,
				height: VIEWPORT_HEIGHT,
				device_scale_factor: Some(1.0),
				emulating_mobile: false,
				is_landscape: true,
				has_touch: false,
			})
			.arg("--disable-blink-features=AutomationControlled")
			.arg("--disable-features=IsolateOrigins,site-per-process")
			.arg("--no-first-run")
			.arg("--no-default-browser-check")
			.arg(format!("--window-size={VIEWPORT_WIDTH},{VIEWPORT_HEIGHT}"));

		if !options.headless {
			builder = builder.with_head();
		}
		if let Some(proxy) = &options.proxy {
			builder = builder.arg(format!("--proxy-server={proxy}"));
		}

		let config = builder.build().map_err(SetupError::ProfileLaunch)?;
		let (browser, handler) = Browser::launch(config)
			.await
			.map_err(|e| SetupError::ProfileLaunch(e.to_string()))?;

		info!(
			target = "onboard.session",
			profile,
			path = %profile_dir.display(),
			headless = options.headless,
			"launched profile browser"
		);
		Ok(BrowserSession {
			browser,
			handler: spawn_handler(handler),
			mode: SessionMode::Launched {
				profile: profile.to_string(),
			},
		})
	}

	/// Names of existing profiles.
	pub fn list_profiles(&self) -> Vec<String> {
		self.profiles.list()
	}

	/// Removes a profile directory. The caller must guard against deleting a
	/// profile bound to a live launched session.
	pub fn delete_profile(&self, name: &str) -> Result<bool> {
		self.profiles.delete(name)
	}
}
