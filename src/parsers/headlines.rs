//! Parsing of the finviz news page into `(time, headline)` pairs.
//!
//! Which table holds the primary feed is a guess at the page layout. The
//! parser first looks for the feed table inside the news container and only
//! then falls back to the first feed-styled table anywhere on the page. The
//! heuristic that matched is reported with the result.

use crate::parsers::inner_text;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static SCOPED_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.news_time-table table.styled-table-new").unwrap());
static ANY_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.styled-table-new").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr.news_table-row").unwrap());
static TIME_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.news_date-cell").unwrap());
static HEADLINE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.nn-tab-link").unwrap());

/// One news line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Headline {
    pub time: String,
    pub text: String,
}

impl Headline {
    pub fn new(time: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            text: text.into(),
        }
    }
}

/// Which heuristic located the feed table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// Found inside the news container
    Scoped,
    /// First feed-styled table in the document
    FirstMatch,
}

/// Headlines parsed from one page
#[derive(Debug, Clone)]
pub struct HeadlineTable {
    pub source: TableSource,
    pub rows_seen: usize,
    pub headlines: Vec<Headline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("no news table (tried `table.news_time-table table.styled-table-new`, `table.styled-table-new`)")]
    NoTable,

    #[error("news table has no `tr.news_table-row` rows")]
    NoRows,
}

pub fn parse_headlines(html: &str) -> Result<HeadlineTable, LayoutError> {
    let doc = Html::parse_document(html);

    let (table, source) = find_table(&doc).ok_or(LayoutError::NoTable)?;
    ::log::debug!("Headline table located via {:?}", source);

    let rows: Vec<ElementRef<'_>> = table.select(&ROW).collect();
    if rows.is_empty() {
        return Err(LayoutError::NoRows);
    }

    let headlines: Vec<Headline> = rows.iter().filter_map(|row| parse_row(*row)).collect();

    if headlines.is_empty() {
        ::log::warn!(
            "Processed {} news rows but none had both a time cell and a headline link",
            rows.len()
        );
    }

    Ok(HeadlineTable {
        source,
        rows_seen: rows.len(),
        headlines,
    })
}

fn find_table(doc: &Html) -> Option<(ElementRef<'_>, TableSource)> {
    if let Some(table) = doc.select(&SCOPED_TABLE).next() {
        return Some((table, TableSource::Scoped));
    }
    doc.select(&ANY_TABLE)
        .next()
        .map(|table| (table, TableSource::FirstMatch))
}

fn parse_row(row: ElementRef<'_>) -> Option<Headline> {
    let time = row.select(&TIME_CELL).next().map(inner_text)?;
    let text = row.select(&HEADLINE_LINK).next().map(inner_text)?;
    if time.is_empty() || text.is_empty() {
        return None;
    }
    Some(Headline { time, text })
}
