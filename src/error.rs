use std::path::PathBuf;
use thiserror::Error;

/// Failures raised before any network activity starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid CSS selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("invalid base URL `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("day_count must be at least 1")]
    EmptyPlan,

    #[error("{days} days before {from} is outside the supported calendar range")]
    DateOutOfRange { from: chrono::NaiveDate, days: i64 },
}

/// Errors reported by a [`crate::browser::Browser`] implementation.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("timed out after {timeout_secs}s waiting for `{selector}`")]
    Timeout { selector: String, timeout_secs: u64 },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("browser command failed: {0}")]
    Command(String),
}

/// A page could not be turned into a record.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("listing container `{selector}` not found on {url} within {timeout_secs}s")]
    NotFound {
        selector: String,
        url: String,
        timeout_secs: u64,
    },

    #[error("no date segment in page URL {0}")]
    UnknownPage(String),

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// The candidate payload did not conform to the report schema.
///
/// The payload is kept verbatim so an operator can recover partial results.
#[derive(Debug, Error)]
#[error("report validation failed: {message}")]
pub struct ValidationError {
    pub message: String,
    pub raw_payload: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, raw_payload: &str) -> Self {
        Self {
            message: message.into(),
            raw_payload: raw_payload.to_string(),
        }
    }
}

/// Outcome of [`crate::report::validate_and_emit`] when no report was saved.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP fetch failures in the headline utility.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("unexpected page structure at {url}: {message}")]
    Structure { url: String, message: String },
}

/// Failures from the text-summarization provider.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("provider rejected the request as invalid: {0}")]
    InvalidArgument(String),

    #[error("provider stopped generation: {0}")]
    ContentStopped(String),

    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not reach summarization provider: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Run-level failures of the leaderboard pipeline.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not connect to any WebDriver server (tried {0})")]
    WebDriver(String),

    #[error("run interrupted after {completed} of {planned} pages; partial results discarded")]
    Interrupted { completed: usize, planned: usize },

    #[error(transparent)]
    Emit(#[from] EmitError),
}
