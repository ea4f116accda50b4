//! URL extraction from free-form shared text.
//!
//! Shared text often carries a page title next to the link, e.g.
//! `"Some article title https://example.com/a"`. Only lowercase `http://`
//! and `https://` schemes are recognised; a URL runs until the next
//! whitespace character.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex pattern for URLs embedded in text
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://\S+").expect("URL_PATTERN: hardcoded regex is invalid")
});

/// Extract the first URL from mixed text content.
///
/// Returns None when the text contains no `http://` or `https://` URL.
pub fn extract_first_url(text: &str) -> Option<&str> {
    URL_PATTERN.find(text).map(|m| m.as_str())
}

/// Extract every URL from mixed text content, in order of appearance.
pub fn extract_all_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}
