// src/extractor.rs
//! Applies a source's selector table to a fetched results page and returns
//! up to ten complete listings, in document order.

use crate::config::{SelectorSet, SourceConfig};
use crate::types::Listing;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// Extraction cap per source.
pub const MAX_LISTINGS: usize = 10;

struct ParsedSelectors {
    container: Selector,
    title: Selector,
    company: Selector,
    link: Selector,
}

fn parse_selectors(set: &SelectorSet) -> Result<ParsedSelectors, String> {
    let parse = |s: &str| Selector::parse(s).map_err(|e| format!("'{}': {}", s, e));
    Ok(ParsedSelectors {
        container: parse(&set.container)?,
        title: parse(&set.title)?,
        company: parse(&set.company)?,
        link: parse(&set.link)?,
    })
}

/// Extract listings from raw HTML. Missing elements are treated as zero
/// results, never as an error; records missing title, company, or url are
/// discarded.
pub fn extract(html: &str, source: &SourceConfig) -> Vec<Listing> {
    let selectors = match parse_selectors(&source.selectors) {
        Ok(s) => s,
        Err(e) => {
            warn!("[{}] invalid selector in source table: {}", source.name, e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let base = Url::parse(&source.url).ok();
    let mut listings = Vec::new();

    for element in document.select(&selectors.container) {
        if listings.len() >= MAX_LISTINGS {
            break;
        }

        let title = select_text(&element, &selectors.title);
        let company = select_text(&element, &selectors.company);
        let url = element
            .select(&selectors.link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| resolve_href(base.as_ref(), href));

        if let (Some(title), Some(company), Some(url)) = (title, company, url) {
            listings.push(Listing::new(title, company, url, source.lang));
        }
    }

    listings
}

fn select_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    let inner = element.select(selector).next()?;
    let text = clean_text(&inner.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Collapse runs of whitespace and drop empty lines.
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Hrefs may be relative to the results page; resolve them against the
/// source's search URL.
fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base?.join(href).ok().map(|u| u.to_string()),
    }
}
