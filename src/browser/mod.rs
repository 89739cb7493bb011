pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

use crate::error::BrowserError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub use webdriver::WebDriverBrowser;

/// The navigation capabilities the harvest loop needs from a browser.
///
/// One value represents one tab; callers drive it strictly sequentially.
#[async_trait]
pub trait Browser: Send {
    /// Navigate the tab to `url`
    async fn open(&mut self, url: &Url) -> Result<(), BrowserError>;

    /// URL of the currently loaded page, after any redirects
    async fn current_url(&mut self) -> Result<Url, BrowserError>;

    /// Wait until an element matching `selector` is present
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Serialized DOM of the current page
    async fn source(&mut self) -> Result<String, BrowserError>;

    /// End the session; the browser must not be used afterwards
    async fn close(&mut self) -> Result<(), BrowserError>;
}
