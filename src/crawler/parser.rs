//! Link extraction from page content
//!
//! Two extractors are available:
//! - pattern: matches `href="..."` and `href='...'` anywhere in the text,
//!   without parsing the document (the default)
//! - markup: parses the document and reads the `href` attribute of every
//!   element that carries one
//!
//! Both return raw, unresolved values. Resolution happens in the processor.

use crate::config::ExtractMode;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Extracts raw href values from `content` using the given mode
pub fn extract_links(content: &str, mode: ExtractMode) -> BTreeSet<String> {
    match mode {
        ExtractMode::Pattern => extract_hrefs(content),
        ExtractMode::Markup => extract_href_attributes(content),
    }
}

/// Returns every distinct quoted `href` value in `content`
///
/// Values are returned exactly as written, entities and surrounding
/// whitespace included. A page without matches yields an empty set.
///
/// # Example
///
/// ```
/// use sumi_harvest::crawler::extract_hrefs;
///
/// let hrefs = extract_hrefs(r#"<a href="/x">x</a> <link href='style.css'>"#);
/// assert!(hrefs.contains("/x"));
/// assert!(hrefs.contains("style.css"));
/// ```
pub fn extract_hrefs(content: &str) -> BTreeSet<String> {
    HREF_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns the `href` attribute of every element in the parsed document
///
/// Unlike [`extract_hrefs`], attribute values come back entity-decoded and
/// unquoted attributes are found too. Text that merely looks like an
/// attribute (inside comments or scripts) is ignored.
pub fn extract_href_attributes(content: &str) -> BTreeSet<String> {
    let document = Html::parse_document(content);

    let selector = match Selector::parse("[href]") {
        Ok(selector) => selector,
        Err(_) => return BTreeSet::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
