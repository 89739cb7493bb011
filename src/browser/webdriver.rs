use crate::browser::Browser;
use crate::error::{BrowserError, HarvestError};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Common local WebDriver addresses tried after the configured one
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A single browser tab driven over WebDriver
pub struct WebDriverBrowser {
    client: Client,
    closed: bool,
}

impl WebDriverBrowser {
    /// Connects to the WebDriver at `webdriver_url`, falling back to common local ports
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, HarvestError> {
        let capabilities = chrome_capabilities(headless);
        let mut tried = vec![webdriver_url.to_string()];

        match try_connect(webdriver_url, &capabilities).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self::from_client(client));
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS {
            if url == webdriver_url {
                continue;
            }
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            tried.push(url.to_string());
            if let Ok(client) = try_connect(url, &capabilities).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self::from_client(client));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(HarvestError::WebDriver(tried.join(", ")))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            closed: false,
        }
    }
}

async fn try_connect(
    url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(url).await
}

/// Chrome session settings: optional headless mode and a 1280x1024 window
fn chrome_capabilities(headless: bool) -> Capabilities {
    let mut args = vec!["--window-size=1280,1024", "--disable-gpu"];
    if headless {
        args.push("--headless=new");
    }

    let mut capabilities = Capabilities::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

/// Maps a WebDriver command error, noting lost sessions separately
fn command_error(error: CmdError, context: &str) -> BrowserError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("WebDriver session lost while {}", context);
    }
    BrowserError::Command(format!("{}: {}", context, error))
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn open(&mut self, url: &Url) -> Result<(), BrowserError> {
        self.client
            .goto(url.as_str())
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn current_url(&mut self) -> Result<Url, BrowserError> {
        self.client
            .current_url()
            .await
            .map_err(|e| command_error(e, "reading current URL"))
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(BrowserError::Timeout {
                selector: selector.to_string(),
                timeout_secs: timeout.as_secs(),
            }),
            Err(e) => Err(command_error(e, "waiting for listing")),
        }
    }

    async fn source(&mut self) -> Result<String, BrowserError> {
        self.client
            .source()
            .await
            .map_err(|e| command_error(e, "getting page source"))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| command_error(e, "closing session"))
    }
}
