use crate::config::ListingSelectors;
use crate::error::ConfigError;
use crate::parsers::{compile_selector, first_text};
use crate::results::{Item, MISSING_TEXT};
use scraper::{ElementRef, Html, Selector};

/// Listing selectors compiled once per run
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    /// Selector the browser waits on before reading the page
    pub wait_css: String,
    container: Option<Selector>,
    item: Selector,
    name: Selector,
    description: Selector,
    metric: Selector,
}

impl CompiledSelectors {
    pub fn compile(selectors: &ListingSelectors) -> Result<Self, ConfigError> {
        let container = selectors
            .container
            .as_deref()
            .map(compile_selector)
            .transpose()?;
        Ok(Self {
            wait_css: selectors
                .container
                .clone()
                .unwrap_or_else(|| selectors.item.clone()),
            container,
            item: compile_selector(&selectors.item)?,
            name: compile_selector(&selectors.name)?,
            description: compile_selector(&selectors.description)?,
            metric: compile_selector(&selectors.metric)?,
        })
    }
}

/// Parses the listing elements of a page snapshot into at most `cap` items.
///
/// Elements are taken in document order, from inside the first container
/// match when a container is configured. Each field is looked up on its own;
/// a missing name or description becomes `"N/A"` and a missing or
/// unparseable metric becomes `0`, so a partial item is still kept.
pub fn parse_listing(html: &str, selectors: &CompiledSelectors, cap: usize) -> Vec<Item> {
    let doc = Html::parse_document(html);

    let elements: Vec<ElementRef<'_>> = match &selectors.container {
        Some(container) => match doc.select(container).next() {
            Some(scope) => scope.select(&selectors.item).take(cap).collect(),
            None => {
                ::log::debug!("Listing container not present in snapshot");
                Vec::new()
            }
        },
        None => doc.select(&selectors.item).take(cap).collect(),
    };

    let items: Vec<Item> = elements
        .into_iter()
        .enumerate()
        .map(|(position, element)| parse_item(position, element, selectors))
        .collect();

    ::log::debug!("Listing parser kept {} items (cap {})", items.len(), cap);
    items
}

fn parse_item(position: usize, element: ElementRef<'_>, selectors: &CompiledSelectors) -> Item {
    let name = first_text(element, &selectors.name);
    let description = first_text(element, &selectors.description);
    let metric = first_text(element, &selectors.metric);

    if name.is_none() || metric.is_none() {
        ::log::debug!(
            "Listing element {} is partial (name: {}, description: {}, metric: {})",
            position,
            name.is_some(),
            description.is_some(),
            metric.is_some()
        );
    }

    Item {
        name: name.unwrap_or_else(|| MISSING_TEXT.to_string()),
        description: description.unwrap_or_else(|| MISSING_TEXT.to_string()),
        metric: metric.as_deref().map(parse_metric).unwrap_or(0),
    }
}

/// Parses an upvote count; anything that is not a plain integer counts as 0
pub fn parse_metric(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}
