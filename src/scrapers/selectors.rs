//! Ordered selector fallback chains.
//!
//! A field is described by a list of [`Strategy`] values. They are tried in
//! order against a parsed document and the first one that yields a non-empty
//! (and accepted) value wins; later strategies are never evaluated.

use scraper::{Html, Selector};
use tracing::debug;

/// One way of reading a value out of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Text content of the first element matching the selector.
    Text(&'static str),
    /// An attribute of the first element matching the selector.
    Attr(&'static str, &'static str),
}

impl Strategy {
    fn selector(&self) -> &'static str {
        match self {
            Strategy::Text(sel) | Strategy::Attr(sel, _) => sel,
        }
    }

    /// Evaluate against `doc`, returning the trimmed value if non-empty.
    pub fn evaluate(&self, doc: &Html) -> Option<String> {
        let css = self.selector();
        let selector = match Selector::parse(css) {
            Ok(selector) => selector,
            Err(e) => {
                debug!(selector = css, error = %e, "Skipping unparsable selector");
                return None;
            }
        };
        let element = doc.select(&selector).next()?;
        let raw = match self {
            Strategy::Text(_) => element.text().collect::<String>(),
            Strategy::Attr(_, attr) => element.value().attr(attr)?.to_string(),
        };
        let value = raw.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// An ordered list of strategies for one field.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    strategies: Vec<Strategy>,
}

impl SelectorChain {
    pub fn new(strategies: impl IntoIterator<Item = Strategy>) -> Self {
        Self {
            strategies: strategies.into_iter().collect(),
        }
    }

    /// First non-empty value.
    pub fn first(&self, doc: &Html) -> Option<String> {
        self.first_accepted(doc, |_| true)
    }

    /// First non-empty value that `accept` approves; rejected values count as empty.
    pub fn first_accepted(&self, doc: &Html, accept: impl Fn(&str) -> bool) -> Option<String> {
        self.strategies
            .iter()
            .filter_map(|strategy| strategy.evaluate(doc))
            .find(|value| accept(value))
    }

    /// Whether any strategy's selector matches an element.
    pub fn matches_any(&self, doc: &Html) -> Option<&'static str> {
        self.strategies.iter().map(Strategy::selector).find(|css| {
            Selector::parse(css)
                .map(|sel| doc.select(&sel).next().is_some())
                .unwrap_or(false)
        })
    }
}
