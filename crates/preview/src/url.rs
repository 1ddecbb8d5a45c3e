//! Recognizing and normalizing URLs copied as text.

use once_cell::sync::Lazy;
use reqwest::Url;
use sha2::{Digest, Sha256};

const SCHEME_PREFIXES: [&str; 4] = ["http://", "https://", "www.", "ftp://"];

static WEB_SEARCH_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://www.google.com/search").expect("search URL is valid"));

/// Returns `true` if `text` looks like a web address.
///
/// Text with an explicit scheme or a leading `www.` is a URL, otherwise it
/// must be a single word with a dot and a top-level part of two or more
/// characters, e.g. `example.com`.
#[must_use]
pub fn is_url(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return false;
    }

    if SCHEME_PREFIXES.iter().any(|prefix| text.starts_with(prefix)) {
        return true;
    }

    text.contains('.')
        && !text.contains(' ')
        && text.rsplit('.').next().is_some_and(|tld| tld.chars().count() >= 2)
}

/// Adds `http://` to text that has no scheme but looks like a host name.
#[must_use]
pub fn normalize_url(text: &str) -> String {
    let text = text.trim();
    let has_scheme = ["http://", "https://", "ftp://"]
        .iter()
        .any(|scheme| text.to_lowercase().starts_with(scheme));
    if !has_scheme && text.contains('.') && !text.contains(' ') {
        format!("http://{text}")
    } else {
        text.to_string()
    }
}

/// Hex encoded SHA-256 of the normalized form of `url`.
#[must_use]
pub fn cache_key(url: &str) -> String { hex::encode(Sha256::digest(normalize_url(url).as_bytes())) }

#[must_use]
pub fn web_search_url(query: &str) -> String {
    let mut url = WEB_SEARCH_URL.clone();
    let _ = url.query_pairs_mut().append_pair("q", query.trim());
    url.into()
}
