use crate::UrlError;
use url::Url;

/// Resolves a raw `href` value against the URL of the page it was found on
///
/// Standard joining rules apply: relative paths, protocol-relative links,
/// and query- or fragment-only references all resolve against `base`, while
/// an absolute href replaces it.
///
/// # Rejected hrefs
///
/// - ASCII control characters anywhere in the value (the URL parser would
///   silently drop tabs and newlines, producing a link that never appeared
///   in the page)
/// - A colon in the first path segment whose prefix is not a valid scheme,
///   e.g. `ht!tp://x`; such a reference is neither absolute nor a legal
///   relative path
/// - Anything the URL parser refuses after joining (empty host, bad port, ...)
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/dir/page").unwrap();
/// assert_eq!(resolve_link(&base, "/x").unwrap().as_str(), "http://a.test/x");
/// assert_eq!(resolve_link(&base, "y").unwrap().as_str(), "http://a.test/dir/y");
/// assert!(resolve_link(&base, "ht!tp://??").is_err());
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, UrlError> {
    if let Some(ch) = href.chars().find(|c| c.is_ascii_control()) {
        return Err(UrlError::IllegalCharacter {
            href: href.to_string(),
            ch,
        });
    }

    let href = href.trim();

    if let Some(scheme) = scheme_candidate(href) {
        if !is_valid_scheme(scheme) {
            return Err(UrlError::MalformedScheme(href.to_string()));
        }
    }

    base.join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))
}

/// Returns the text before the first `:` if it comes before any `/`, `?` or `#`
fn scheme_candidate(href: &str) -> Option<&str> {
    let end = href.find([':', '/', '?', '#'])?;
    if href[end..].starts_with(':') {
        Some(&href[..end])
    } else {
        None
    }
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
