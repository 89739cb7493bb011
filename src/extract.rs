use crate::browser::Browser;
use crate::error::{BrowserError, ExtractionError};
use crate::parsers::listing::{CompiledSelectors, parse_listing};
use crate::plan::page_key_from_url;
use crate::results::PageRecord;
use std::time::Duration;

/// Per-run extraction settings
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum items kept per page
    pub cap: usize,
    /// How long to wait for the listing to render
    pub wait_timeout: Duration,
}

/// Extracts one record from the page currently loaded in `browser`.
///
/// The page key comes from the browser's current URL, not from the URL that
/// was requested, so a redirect is attributed to the date actually shown.
pub async fn extract_page<B: Browser + ?Sized>(
    browser: &mut B,
    selectors: &CompiledSelectors,
    options: &ExtractOptions,
) -> Result<PageRecord, ExtractionError> {
    let url = browser.current_url().await?;

    match browser
        .wait_for_selector(&selectors.wait_css, options.wait_timeout)
        .await
    {
        Ok(()) => {}
        Err(BrowserError::Timeout {
            selector,
            timeout_secs,
        }) => {
            return Err(ExtractionError::NotFound {
                selector,
                url: url.to_string(),
                timeout_secs,
            });
        }
        Err(e) => return Err(e.into()),
    }

    let page_key =
        page_key_from_url(&url).ok_or_else(|| ExtractionError::UnknownPage(url.to_string()))?;

    let html = browser.source().await?;
    let items = parse_listing(&html, selectors, options.cap);

    if items.is_empty() {
        ::log::info!("No products found on {} ({})", page_key, url);
    } else {
        ::log::info!("Extracted {} products for {}", items.len(), page_key);
    }

    Ok(PageRecord::from_items(page_key, items))
}
