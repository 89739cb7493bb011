// Re-export modules
pub mod accumulator;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod news;
pub mod parsers;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod results;
pub mod summarize;

// Re-export commonly used types for convenience
pub use results::{Item, PageRecord, PageStatus, Report};

use browser::{Browser, WebDriverBrowser};
use chrono::NaiveDate;
use config::HarvestConfig;
use error::{ConfigError, EmitError, HarvestError, SummaryError};
use extract::ExtractOptions;
use news::HeadlineFetcher;
use parsers::headlines::Headline;
use parsers::listing::CompiledSelectors;
use pipeline::Interrupt;
use plan::PlannedPage;
use report::ReportSink;
use std::path::{Path, PathBuf};
use summarize::Summarizer;
use url::Url;

/// Builder for a leaderboard harvest run
pub struct Harvest {
    config: HarvestConfig,
    interrupt: Interrupt,
}

impl Harvest {
    pub fn new(config: HarvestConfig) -> Self {
        Self {
            config,
            interrupt: Interrupt::new(),
        }
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        self.config = HarvestConfig::from_file(path)?;
        Ok(self)
    }

    /// Override the number of days collected
    pub fn with_day_count(mut self, day_count: usize) -> Self {
        self.config.day_count = day_count;
        self
    }

    /// Pin the most recent day instead of deriving it from the clock
    pub fn with_anchor_date(mut self, anchor: NaiveDate) -> Self {
        self.config.anchor_date = Some(anchor);
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Share an interrupt flag with the caller
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// The pages this run will visit, newest first
    pub fn plan(&self) -> Result<Vec<PlannedPage>, ConfigError> {
        if self.config.day_count == 0 {
            return Err(ConfigError::EmptyPlan);
        }
        let base_url = Url::parse(&self.config.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.config.base_url.clone(),
            source,
        })?;
        let anchor = self.config.resolve_anchor_date()?;
        plan::plan_pages(&base_url, anchor, self.config.day_count)
    }

    /// Connects to WebDriver, visits every planned page and saves the report
    pub async fn run(self) -> Result<Report, HarvestError> {
        let (plan, selectors) = self.prepare()?;

        let mut browser =
            WebDriverBrowser::connect(&self.config.webdriver_url, self.config.headless).await?;
        let result = self.execute(&mut browser, &plan, &selectors).await;

        if let Err(e) = browser.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
        result
    }

    /// Like [`Harvest::run`], with a caller-supplied browser
    pub async fn run_with_browser<B: Browser + ?Sized>(
        &self,
        browser: &mut B,
    ) -> Result<Report, HarvestError> {
        let (plan, selectors) = self.prepare()?;
        self.execute(browser, &plan, &selectors).await
    }

    fn prepare(&self) -> Result<(Vec<PlannedPage>, CompiledSelectors), ConfigError> {
        let selectors = CompiledSelectors::compile(&self.config.selectors)?;
        let plan = self.plan()?;
        ::log::info!("Planned {} pages:", plan.len());
        for page in &plan {
            ::log::info!("  {}", page.url);
        }
        Ok((plan, selectors))
    }

    async fn execute<B: Browser + ?Sized>(
        &self,
        browser: &mut B,
        plan: &[PlannedPage],
        selectors: &CompiledSelectors,
    ) -> Result<Report, HarvestError> {
        let options = ExtractOptions {
            cap: self.config.top_n,
            wait_timeout: self.config.wait_timeout(),
        };
        let report = pipeline::harvest(browser, plan, selectors, &options, &self.interrupt).await?;

        let inconclusive = report.inconclusive_count();
        if inconclusive > 0 {
            ::log::warn!(
                "{} of {} pages have no confirmed data",
                inconclusive,
                report.records.len()
            );
        }

        let payload = report::to_canonical_json(&report).map_err(EmitError::from)?;
        let sink = ReportSink::new(&self.config.output_path);
        Ok(report::validate_and_emit(&payload, self.config.top_n, &sink)?)
    }
}

/// Headlines gathered by [`collect_headlines`], with an optional summary
#[derive(Debug)]
pub struct HeadlineDigest {
    pub headlines: Vec<Headline>,
    pub summary: Option<Result<String, SummaryError>>,
}

/// Fetches and deduplicates headlines from every configured URL and, when a
/// summarizer is given, asks it for a briefing
pub async fn collect_headlines(
    config: &HarvestConfig,
    urls: &[String],
    summarizer: Option<&dyn Summarizer>,
) -> Result<HeadlineDigest, reqwest::Error> {
    let fetcher = HeadlineFetcher::new(config)?;
    let headlines = fetcher.collect(urls).await.into_vec();
    ::log::info!("Collected {} unique headlines", headlines.len());

    let summary = match summarizer {
        Some(summarizer) if !headlines.is_empty() => {
            let prompt = news::build_prompt(&headlines);
            Some(summarizer.summarize(&prompt).await)
        }
        _ => None,
    };

    Ok(HeadlineDigest { headlines, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeBrowser, FakePage};
    use crate::parsers::tests::{leaderboard_page, product_html};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn output_path() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("harvest-run-{}-{}.json", std::process::id(), nanos))
    }

    #[test]
    fn test_plan_rejects_zero_days() {
        let harvest = Harvest::new(HarvestConfig::default()).with_day_count(0);
        assert!(matches!(harvest.plan(), Err(ConfigError::EmptyPlan)));
    }

    #[test]
    fn test_plan_rejects_bad_base_url() {
        let harvest = Harvest::new(HarvestConfig {
            base_url: "not a url".to_string(),
            ..HarvestConfig::default()
        });
        assert!(matches!(harvest.plan(), Err(ConfigError::BaseUrl { .. })));
    }

    #[test]
    fn test_plan_rejects_dates_outside_calendar() {
        let config = HarvestConfig::from_json(r#"{"day_count": 100000000, "anchor_date": "2025-06-10"}"#)
            .unwrap();
        assert!(matches!(
            Harvest::new(config).plan(),
            Err(ConfigError::DateOutOfRange { .. })
        ));

        let config = HarvestConfig::from_json(r#"{"anchor_offset_days": 9223372036854775807}"#).unwrap();
        assert!(matches!(
            Harvest::new(config).plan(),
            Err(ConfigError::DateOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_plan_fails_before_navigation() {
        let harvest = Harvest::new(HarvestConfig::default())
            .with_anchor_date(NaiveDate::MIN)
            .with_day_count(2);
        let mut browser = FakeBrowser::new();

        let err = harvest.run_with_browser(&mut browser).await.unwrap_err();

        assert!(matches!(err, HarvestError::Config(ConfigError::DateOutOfRange { .. })));
        assert!(browser.visited.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_selector_fails_before_navigation() {
        let mut config = HarvestConfig::default();
        config.selectors.metric = "div[".to_string();
        let harvest = Harvest::new(config);
        let mut browser = FakeBrowser::new();

        let err = harvest.run_with_browser(&mut browser).await.unwrap_err();

        assert!(matches!(err, HarvestError::Config(ConfigError::Selector { .. })));
        assert!(browser.visited.is_empty());
    }

    #[tokio::test]
    async fn test_run_writes_complete_report() {
        let path = output_path();
        let harvest = Harvest::new(HarvestConfig::default())
            .with_day_count(3)
            .with_anchor_date(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
            .with_output_path(&path);
        let plan = harvest.plan().unwrap();

        let html = leaderboard_page(&[
            product_html(1, "Alpha", "First", "120"),
            product_html(2, "Beta", "Second", "N/A"),
        ]);
        let mut browser = FakeBrowser::new()
            .with_page(&plan[0].url, FakePage::Html(html))
            .with_page(&plan[2].url, FakePage::Stalls);

        let report = harvest.run_with_browser(&mut browser).await.unwrap();

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.records[0].page_key, "2025-06-10");
        assert_eq!(report.records[0].items[1].metric, 0);
        assert!(!report.records[1].is_conclusive());
        assert!(!report.records[2].is_conclusive());

        let saved = std::fs::read_to_string(&path).unwrap();
        let reloaded = report::validate(&saved, 5).unwrap();
        assert_eq!(reloaded, report);
        std::fs::remove_file(&path).unwrap();
    }
}
