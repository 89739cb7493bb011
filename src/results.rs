use serde::{Deserialize, Serialize};

/// Placeholder for a text field whose element could not be found
pub const MISSING_TEXT: &str = "N/A";

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Product name
    pub name: String,

    /// Short description (may be the placeholder)
    pub description: String,

    /// Upvote count
    #[serde(rename = "upvotes")]
    pub metric: u64,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>, metric: u64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            metric,
        }
    }
}

/// How a page's record came to be
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageStatus {
    /// At least one item was extracted
    Extracted,

    /// The listing was present but held no items
    Empty,

    /// Navigation or extraction failed; nothing is known about the page
    Failed { reason: String },

    /// The page was planned but never recorded
    Missing,
}

impl PageStatus {
    /// Only an extracted page may carry items
    pub fn holds_items(&self) -> bool {
        matches!(self, PageStatus::Extracted)
    }
}

/// The result for a single dated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRecordWire")]
pub struct PageRecord {
    /// Date key in `YYYY-MM-DD` form
    #[serde(rename = "date")]
    pub page_key: String,

    /// Items in document order
    #[serde(rename = "products")]
    pub items: Vec<Item>,

    pub status: PageStatus,
}

/// Incoming form of a record; payloads written without a status marker get
/// one derived from their items
#[derive(Deserialize)]
struct PageRecordWire {
    #[serde(rename = "date")]
    page_key: String,
    #[serde(rename = "products")]
    items: Vec<Item>,
    #[serde(default)]
    status: Option<PageStatus>,
}

impl From<PageRecordWire> for PageRecord {
    fn from(wire: PageRecordWire) -> Self {
        match wire.status {
            Some(status) => Self {
                page_key: wire.page_key,
                items: wire.items,
                status,
            },
            None => Self::from_items(wire.page_key, wire.items),
        }
    }
}

impl PageRecord {
    /// Builds a record from extracted items, marking it empty when there are none
    pub fn from_items(page_key: impl Into<String>, items: Vec<Item>) -> Self {
        let status = if items.is_empty() {
            PageStatus::Empty
        } else {
            PageStatus::Extracted
        };
        Self {
            page_key: page_key.into(),
            items,
            status,
        }
    }

    pub fn failed(page_key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            page_key: page_key.into(),
            items: Vec::new(),
            status: PageStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn missing(page_key: impl Into<String>) -> Self {
        Self {
            page_key: page_key.into(),
            items: Vec::new(),
            status: PageStatus::Missing,
        }
    }

    /// True when the page is known to have data or known to have none
    pub fn is_conclusive(&self) -> bool {
        matches!(self.status, PageStatus::Extracted | PageStatus::Empty)
    }
}

/// The consolidated report, one record per planned page in plan order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "leaderboards")]
    pub records: Vec<PageRecord>,
}

impl Report {
    pub fn new(records: Vec<PageRecord>) -> Self {
        Self { records }
    }

    /// Number of pages that did not yield a conclusive result
    pub fn inconclusive_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_conclusive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_marks_empty() {
        let record = PageRecord::from_items("2025-06-01", Vec::new());
        assert_eq!(record.status, PageStatus::Empty);
        assert!(record.is_conclusive());

        let record = PageRecord::from_items("2025-06-01", vec![Item::new("A", "B", 3)]);
        assert_eq!(record.status, PageStatus::Extracted);
    }

    #[test]
    fn test_wire_names() {
        let report = Report::new(vec![PageRecord::from_items(
            "2025-06-01",
            vec![Item::new("Widget", "Does things", 42)],
        )]);
        let value = serde_json::to_value(&report).unwrap();

        let page = &value["leaderboards"][0];
        assert_eq!(page["date"], "2025-06-01");
        assert_eq!(page["products"][0]["upvotes"], 42);
        assert_eq!(page["status"]["kind"], "extracted");
    }

    #[test]
    fn test_status_derived_when_absent() {
        let json = r#"{"date": "2025-06-01", "products": []}"#;
        let record: PageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, PageStatus::Empty);

        let json = r#"{"date": "2025-06-01", "products": [
            {"name": "A", "description": "B", "upvotes": 3}
        ]}"#;
        let record: PageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, PageStatus::Extracted);
    }

    #[test]
    fn test_explicit_status_is_kept() {
        let json = r#"{"date": "2025-06-01", "products": [], "status": {"kind": "missing"}}"#;
        let record: PageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, PageStatus::Missing);
        assert!(!record.is_conclusive());
    }

    #[test]
    fn test_failed_status_round_trip() {
        let record = PageRecord::failed("2025-06-02", "timed out");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""kind":"failed""#));
        let back: PageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(!back.is_conclusive());
    }
}
