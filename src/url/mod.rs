//! URL handling module for Sumi-Harvest
//!
//! Resolves raw `href` values found in a page against the page URL.

mod resolve;

pub use resolve::resolve_link;
