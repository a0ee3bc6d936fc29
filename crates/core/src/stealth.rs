//! Fingerprint-masking scripts applied to every page.
//!
//! Installed through `Page.addScriptToEvaluateOnNewDocument`, so the
//! overrides run before any site script on every navigation within the page.
//! Masking must be in place before the first navigation; it does not persist
//! onto pages obtained outside [`crate::session::BrowserSession::page`].

/// Overrides the automation-detectable browser properties: `webdriver`
/// reports false, a stub runtime marker object exists, and the plugin and
/// language lists are non-empty.
pub const MASKING_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => false });
window.chrome = window.chrome || { runtime: {} };
Object.defineProperty(navigator, 'plugins', {
  get: () => [
    { name: 'Chrome PDF Plugin', filename: 'internal-pdf-viewer' },
    { name: 'Chrome PDF Viewer', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai' },
    { name: 'Native Client', filename: 'internal-nacl-plugin' },
  ],
});
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
"#;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn masks_the_automation_flag() {
		assert!(MASKING_SCRIPT.contains("'webdriver'"));
		assert!(MASKING_SCRIPT.contains("get: () => false"));
	}

	#[test]
	fn installs_runtime_marker_stub() {
		assert!(MASKING_SCRIPT.contains("window.chrome"));
		assert!(MASKING_SCRIPT.contains("runtime"));
	}

	#[test]
	fn reports_non_empty_plugins_and_languages() {
		assert!(MASKING_SCRIPT.contains("Chrome PDF Plugin"));
		assert!(MASKING_SCRIPT.contains("'en-US', 'en'"));
	}
}
