//! Fragment extraction and JSON decoding
//!
//! The page embeds its data as JSON text inside an element. [`extract_fragment`]
//! reads that element's inner markup and [`decode`] turns it into a
//! [`serde_json::Value`] without imposing any schema on it.

use crate::browser::PageSource;
use crate::error::{Result, ScrapeError};
use serde_json::Value;
use std::time::Duration;

/// Inner markup read from one element of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Selector the fragment was located with
    pub selector: String,

    /// Inner markup of the element, excluding its own tags
    pub markup: String,
}

impl Fragment {
    pub fn new(selector: impl Into<String>, markup: impl Into<String>) -> Self {
        Self { selector: selector.into(), markup: markup.into() }
    }

    pub fn len(&self) -> usize {
        self.markup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }
}

/// Read the inner markup of the first element matching `selector`
pub fn extract_fragment<S: PageSource>(source: &S, selector: &str, timeout: Duration) -> Result<Fragment> {
    let markup = source.inner_html(selector, timeout)?;
    log::debug!("Extracted {} bytes from '{}'", markup.len(), selector);
    Ok(Fragment::new(selector, markup))
}

/// Parse a fragment's markup as JSON
pub fn decode(fragment: &Fragment) -> Result<Value> {
    serde_json::from_str(fragment.markup.trim()).map_err(|source| ScrapeError::MalformedJson {
        selector: fragment.selector.clone(),
        source,
    })
}
