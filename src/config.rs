use crate::error::ConfigError;
use chrono::{Local, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the summarization API key
pub const API_KEY_VAR: &str = "AZURE_OPENAI_KEY";

/// Environment variable holding the summarization endpoint
pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";

/// CSS selectors used to pull items off a leaderboard page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Element whose presence means the listing has rendered; the item
    /// selector is waited on when absent
    #[serde(default)]
    pub container: Option<String>,

    /// One match per listing element
    #[serde(default = "default_item_selector")]
    pub item: String,

    /// Name, relative to a listing element
    #[serde(default = "default_name_selector")]
    pub name: String,

    /// Description, relative to a listing element
    #[serde(default = "default_description_selector")]
    pub description: String,

    /// Upvote count, relative to a listing element
    #[serde(default = "default_metric_selector")]
    pub metric: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: None,
            item: default_item_selector(),
            name: default_name_selector(),
            description: default_description_selector(),
            metric: default_metric_selector(),
        }
    }
}

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Leaderboard root; dates are appended as `/{year}/{month}/{day}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of consecutive days to collect
    #[serde(default = "default_day_count")]
    pub day_count: usize,

    /// Most recent day to collect; derived from the clock when absent
    #[serde(default)]
    pub anchor_date: Option<NaiveDate>,

    /// Days subtracted from today when `anchor_date` is absent
    #[serde(default = "default_anchor_offset_days")]
    pub anchor_offset_days: i64,

    /// Maximum items kept per page
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// How long to wait for the listing to appear
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Where the validated report is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default)]
    pub selectors: ListingSelectors,

    /// News pages scanned by the headline utility
    #[serde(default = "default_headline_urls")]
    pub headline_urls: Vec<String>,

    /// User-Agent sent by the headline utility
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Send collected headlines to the summarizer
    #[serde(default)]
    pub summarize: bool,

    #[serde(default = "default_azure_deployment")]
    pub azure_deployment: String,

    #[serde(default = "default_azure_api_version")]
    pub azure_api_version: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            day_count: default_day_count(),
            anchor_date: None,
            anchor_offset_days: default_anchor_offset_days(),
            top_n: default_top_n(),
            wait_timeout_secs: default_wait_timeout_secs(),
            output_path: default_output_path(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            selectors: ListingSelectors::default(),
            headline_urls: default_headline_urls(),
            user_agent: default_user_agent(),
            http_timeout_secs: default_http_timeout_secs(),
            summarize: false,
            azure_deployment: default_azure_deployment(),
            azure_api_version: default_azure_api_version(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Applies `WEBDRIVER_URL` when it is set and non-empty
    pub fn apply_env_overrides(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// The most recent day in the plan
    pub fn resolve_anchor_date(&self) -> Result<NaiveDate, ConfigError> {
        match self.anchor_date {
            Some(anchor) => Ok(anchor),
            None => offset_from(Local::now().date_naive(), self.anchor_offset_days),
        }
    }

    pub fn wait_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.wait_timeout_secs)
    }
}

fn offset_from(today: NaiveDate, days: i64) -> Result<NaiveDate, ConfigError> {
    TimeDelta::try_days(days)
        .and_then(|delta| today.checked_sub_signed(delta))
        .ok_or(ConfigError::DateOutOfRange { from: today, days })
}

/// The two secrets that must be present before anything touches the network
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub endpoint: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Credentials {
    /// Reads both credentials from the process environment, honouring `.env`
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads both credentials through `lookup`; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };
        Ok(Self {
            api_key: read(API_KEY_VAR)?,
            endpoint: read(ENDPOINT_VAR)?,
        })
    }
}

fn default_base_url() -> String {
    "https://www.producthunt.com/leaderboard/daily".to_string()
}

fn default_day_count() -> usize {
    10
}

fn default_anchor_offset_days() -> i64 {
    5
}

fn default_top_n() -> usize {
    5
}

fn default_wait_timeout_secs() -> u64 {
    15
}

fn default_output_path() -> PathBuf {
    PathBuf::from("product_hunt_leaderboard_report.json")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_item_selector() -> String {
    r#"div[data-test^="post-item-"]"#.to_string()
}

fn default_name_selector() -> String {
    "h3".to_string()
}

fn default_description_selector() -> String {
    "div > div > div:nth-child(2)".to_string()
}

fn default_metric_selector() -> String {
    r#"div[class*="styles_voteButtonContainer"] button > div > div"#.to_string()
}

fn default_headline_urls() -> Vec<String> {
    vec!["https://finviz.com/news.ashx".to_string()]
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_azure_deployment() -> String {
    "gpt-4.1".to_string()
}

fn default_azure_api_version() -> String {
    "2025-01-01-preview".to_string()
}
