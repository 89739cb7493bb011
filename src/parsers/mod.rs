pub mod headlines;
pub mod listing;

#[cfg(test)]
pub(crate) mod tests;

use crate::error::ConfigError;
use scraper::{ElementRef, Selector};

/// Rendered text of an element with runs of whitespace collapsed to one space
pub fn inner_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first descendant matching `selector`, if any and non-blank
pub fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(inner_text)
        .filter(|text| !text.is_empty())
}

/// Compiles a CSS selector, reporting failures as configuration errors
pub fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
