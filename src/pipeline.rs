use crate::accumulator::Accumulator;
use crate::browser::Browser;
use crate::error::HarvestError;
use crate::extract::{ExtractOptions, extract_page};
use crate::parsers::listing::CompiledSelectors;
use crate::plan::PlannedPage;
use crate::results::{PageRecord, Report};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag checked between pages; set once the user asks to stop
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag on the first Ctrl-C
    pub fn listen_for_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                ::log::warn!("Interrupt received; stopping after the current page");
                flag.trigger();
            }
        });
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Visits every planned page in order and consolidates the results.
///
/// A page that cannot be loaded or extracted is recorded as failed and the
/// run moves on. Only an interrupt ends the loop early, and then nothing
/// gathered so far is returned.
pub async fn harvest<B: Browser + ?Sized>(
    browser: &mut B,
    plan: &[PlannedPage],
    selectors: &CompiledSelectors,
    options: &ExtractOptions,
    interrupt: &Interrupt,
) -> Result<Report, HarvestError> {
    let mut accumulator = Accumulator::new(plan.iter().map(|p| p.key.clone()).collect());
    let start_time = std::time::Instant::now();

    for (index, page) in plan.iter().enumerate() {
        if interrupt.is_triggered() {
            return Err(HarvestError::Interrupted {
                completed: index,
                planned: plan.len(),
            });
        }

        ::log::info!("[{}/{}] Opening {}", index + 1, plan.len(), page.url);
        let record = visit(browser, page, selectors, options).await;

        if record.page_key != page.key {
            ::log::warn!(
                "Requested {} but the browser showed {}",
                page.key,
                record.page_key
            );
        }
        accumulator.record(record);
    }

    ::log::info!(
        "Visited {} pages in {:.2} seconds",
        plan.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(accumulator.finalize())
}

async fn visit<B: Browser + ?Sized>(
    browser: &mut B,
    page: &PlannedPage,
    selectors: &CompiledSelectors,
    options: &ExtractOptions,
) -> PageRecord {
    if let Err(e) = browser.open(&page.url).await {
        ::log::error!("Failed to load {} for {}: {}", page.url, page.key, e);
        return PageRecord::failed(&page.key, e.to_string());
    }

    match extract_page(browser, selectors, options).await {
        Ok(record) => record,
        Err(e) => {
            ::log::warn!("Extraction failed for {} ({}): {}", page.key, page.url, e);
            PageRecord::failed(&page.key, e.to_string())
        }
    }
}
