//! Planning of the dated pages a run will visit.
//!
//! The plan is fixed before navigation begins and is the reference the
//! accumulator checks completeness against.

use crate::error::ConfigError;
use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Format of every page key
pub const PAGE_KEY_FORMAT: &str = "%Y-%m-%d";

static DATE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d{4})/(\d{1,2})/(\d{1,2})/?$").unwrap());

/// A page the run has committed to visiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    pub key: String,
    pub date: NaiveDate,
    pub url: Url,
}

/// `count` consecutive dates ending at `anchor`, newest first.
///
/// Fails without allocating when the oldest date would fall outside the
/// calendar range chrono supports.
pub fn plan_dates(anchor: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, ConfigError> {
    if let Some(oldest) = count.checked_sub(1) {
        if days_before(anchor, oldest).is_none() {
            return Err(ConfigError::DateOutOfRange {
                from: anchor,
                days: i64::try_from(oldest).unwrap_or(i64::MAX),
            });
        }
    }
    Ok((0..count)
        .map_while(|offset| days_before(anchor, offset))
        .collect())
}

fn days_before(anchor: NaiveDate, days: usize) -> Option<NaiveDate> {
    anchor.checked_sub_days(Days::new(u64::try_from(days).ok()?))
}

/// Page keys for `count` consecutive days ending at `anchor`, newest first
pub fn build_page_keys(anchor: NaiveDate, count: usize) -> Result<Vec<String>, ConfigError> {
    Ok(plan_dates(anchor, count)?.into_iter().map(page_key).collect())
}

/// Full plan: key, date and URL for each page, newest first
pub fn plan_pages(
    base_url: &Url,
    anchor: NaiveDate,
    count: usize,
) -> Result<Vec<PlannedPage>, ConfigError> {
    Ok(plan_dates(anchor, count)?
        .into_iter()
        .map(|date| PlannedPage {
            key: page_key(date),
            date,
            url: page_url(base_url, date),
        })
        .collect())
}

pub fn page_key(date: NaiveDate) -> String {
    date.format(PAGE_KEY_FORMAT).to_string()
}

/// Appends the unpadded `{year}/{month}/{day}` path the leaderboard expects
pub fn page_url(base_url: &Url, date: NaiveDate) -> Url {
    let mut url = base_url.clone();
    let path = format!(
        "{}/{}/{}/{}",
        base_url.path().trim_end_matches('/'),
        date.year(),
        date.month(),
        date.day()
    );
    url.set_path(&path);
    url
}

/// Recovers the page key from the trailing date segment of a page URL
pub fn page_key_from_url(url: &Url) -> Option<String> {
    let caps = DATE_SEGMENT.captures(url.path())?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(page_key)
}
