//! In-memory browser serving fixed HTML per URL.

use crate::browser::Browser;
use crate::error::BrowserError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// What a fake page does when visited
#[derive(Debug, Clone)]
pub enum FakePage {
    /// Loads and serves this HTML
    Html(String),
    /// Loads but the listing never appears
    Stalls,
    /// Navigation itself fails
    Unreachable,
    /// Redirects to another URL and serves its HTML
    Redirect(Url, String),
}

#[derive(Debug, Default)]
pub struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    current: Option<(Url, FakePage)>,
    pub visited: Vec<String>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &Url, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn open(&mut self, url: &Url) -> Result<(), BrowserError> {
        self.visited.push(url.to_string());
        match self.pages.get(url.as_str()).cloned() {
            Some(FakePage::Unreachable) | None => {
                self.current = None;
                Err(BrowserError::Navigation {
                    url: url.to_string(),
                    message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                })
            }
            Some(FakePage::Redirect(target, html)) => {
                self.current = Some((target, FakePage::Html(html)));
                Ok(())
            }
            Some(page) => {
                self.current = Some((url.clone(), page));
                Ok(())
            }
        }
    }

    async fn current_url(&mut self) -> Result<Url, BrowserError> {
        self.current
            .as_ref()
            .map(|(url, _)| url.clone())
            .ok_or_else(|| BrowserError::Command("no page loaded".to_string()))
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let timed_out = || BrowserError::Timeout {
            selector: selector.to_string(),
            timeout_secs: timeout.as_secs(),
        };
        match &self.current {
            Some((_, FakePage::Html(html))) => {
                let doc = scraper::Html::parse_document(html);
                let sel = scraper::Selector::parse(selector)
                    .map_err(|e| BrowserError::Command(format!("{:?}", e)))?;
                if doc.select(&sel).next().is_some() {
                    Ok(())
                } else {
                    Err(timed_out())
                }
            }
            Some(_) => Err(timed_out()),
            None => Err(BrowserError::Command("no page loaded".to_string())),
        }
    }

    async fn source(&mut self) -> Result<String, BrowserError> {
        match &self.current {
            Some((_, FakePage::Html(html))) => Ok(html.clone()),
            _ => Err(BrowserError::Command("no page loaded".to_string())),
        }
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.current = None;
        Ok(())
    }
}
