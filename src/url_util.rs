//! Address normalization for navigations.

use url::Url;

/// Schemes that legitimately have no authority or path hierarchy.
const OPAQUE_SCHEMES: &[&str] = &["about", "blob", "data", "javascript", "mailto"];

/// Parse `raw`, optionally applying [`fixup_url`] when it is not a usable URL.
pub fn make_url(raw: &str, fixup: bool) -> Option<Url> {
    if fixup {
        return fixup_url(raw);
    }
    Url::parse(raw.trim()).ok()
}

/// Normalize user-supplied input into a navigable URL.
///
/// Inputs without a scheme (`example.com`, `localhost:8080`) are retried as
/// `http://`. Returns `None` when nothing navigable can be produced.
pub fn fixup_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(trimmed) {
        if !url.cannot_be_a_base() || OPAQUE_SCHEMES.contains(&url.scheme()) {
            return Some(url);
        }
    }

    Url::parse(&format!("http://{trimmed}")).ok()
}
