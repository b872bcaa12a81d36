//! Element lookup strategies.
//!
//! A [`Probe`] looks for one element inside a scope. A [`ProbeChain`] tries
//! its probes in order and returns the first hit; results from different
//! probes are never merged.

use scraper::{ElementRef, Selector};

use crate::error::ExtractError;

/// A strategy that locates a single element below `scope`.
pub trait Probe {
    /// Return the matching element, if any.
    fn probe<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>>;

    /// Human-readable description for logs.
    fn describe(&self) -> &str;
}

/// Probe backed by a CSS selector; returns the first descendant match.
#[derive(Debug, Clone)]
pub struct SelectorProbe {
    source: String,
    selector: Selector,
}

impl SelectorProbe {
    /// Compile a CSS selector.
    pub fn parse(css: &str) -> Result<Self, ExtractError> {
        let selector = compile(css)?;
        Ok(Self {
            source: css.to_string(),
            selector,
        })
    }

    /// The compiled selector.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl Probe for SelectorProbe {
    fn probe<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(&self.selector).next()
    }

    fn describe(&self) -> &str {
        &self.source
    }
}

/// Ordered list of probes; first success wins.
#[derive(Default)]
pub struct ProbeChain {
    probes: Vec<Box<dyn Probe>>,
}

impl ProbeChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain of selector probes, preserving order.
    pub fn from_selectors(selectors: &[String]) -> Result<Self, ExtractError> {
        let mut chain = Self::new();
        for css in selectors {
            chain = chain.with_probe(SelectorProbe::parse(css)?);
        }
        Ok(chain)
    }

    /// Append a probe to the end of the chain.
    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// Number of probes in the chain.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Check if the chain has no probes.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// First element found by any probe, in chain order.
    pub fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.probes.iter().find_map(|p| p.probe(scope))
    }

    /// Trimmed text content of the first match.
    pub fn text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first_match(scope).map(element_text)
    }
}

impl std::fmt::Debug for ProbeChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.probes.iter().map(|p| p.describe()))
            .finish()
    }
}

/// Concatenated, trimmed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn compile(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    /// Matches an element by attribute value rather than by selector.
    struct AttrProbe(&'static str);

    impl Probe for AttrProbe {
        fn probe<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
            scope
                .descendants()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().attr("data-role") == Some(self.0))
        }

        fn describe(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_first_probe_wins() {
        let doc = Html::parse_fragment(
            r#"<div><span class="b">second</span><span class="a">first</span></div>"#,
        );
        let chain =
            ProbeChain::from_selectors(&[".a".to_string(), ".b".to_string()]).unwrap();
        assert_eq!(chain.text(doc.root_element()).as_deref(), Some("first"));
    }

    #[test]
    fn test_falls_through_to_later_probe() {
        let doc = Html::parse_fragment(r#"<div><em data-role="title"> Hat </em></div>"#);
        let chain = ProbeChain::from_selectors(&[".missing".to_string()])
            .unwrap()
            .with_probe(AttrProbe("title"));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.text(doc.root_element()).as_deref(), Some("Hat"));
    }

    #[test]
    fn test_no_match() {
        let doc = Html::parse_fragment("<p>nothing</p>");
        let chain = ProbeChain::from_selectors(&[".x".to_string()]).unwrap();
        assert!(chain.first_match(doc.root_element()).is_none());
    }

    #[test]
    fn test_invalid_selector() {
        let err = SelectorProbe::parse("[[nope").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSelector { .. }));
    }
}
