use std::time::Duration;

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use reqwest::{header, Client, Url};
use snafu::ResultExt;

use crate::{error, url::normalize_url, Error};

const USER_AGENT: &str = "Mozilla/5.0";
const NO_TITLE: &str = "No title";
const NO_DESCRIPTION: &str = "No description available";
const ERROR_TITLE: &str = "Error loading preview";

static TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid"));
static META_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("meta pattern is valid"));
static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\s[^>]*>").expect("link pattern is valid"));
static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("attribute pattern is valid")
});
static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("entity pattern is valid")
});

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageMetadata {
    pub url: String,

    pub title: String,

    pub description: String,

    pub favicon_url: Option<String>,
}

impl PageMetadata {
    /// Extracts the title, description and favicon of an HTML page.
    #[must_use]
    pub fn from_html(url: &str, html: &str) -> Self {
        let title = TITLE_REGEX
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| collapse_whitespace(&decode_entities(m.as_str())))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let metas = tag_attributes(&META_REGEX, html);
        let find_meta = |key: &str, value: &str| {
            metas.iter().find_map(|attrs| {
                attribute(attrs, key)
                    .filter(|v| v.eq_ignore_ascii_case(value))
                    .and_then(|_| attribute(attrs, "content"))
            })
        };
        let description = find_meta("name", "description")
            .or_else(|| find_meta("property", "og:description"))
            .map(|content| decode_entities(content.trim()))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        let links = tag_attributes(&LINK_REGEX, html);
        let find_link = |rel: &str| {
            links.iter().find_map(|attrs| {
                attribute(attrs, "rel")
                    .filter(|v| v.trim().eq_ignore_ascii_case(rel))
                    .and_then(|_| attribute(attrs, "href"))
            })
        };
        let favicon_url = find_link("icon")
            .or_else(|| find_link("shortcut icon"))
            .and_then(|href| resolve_url(url, href.trim()));

        Self { url: url.to_string(), title, description, favicon_url }
    }

    fn from_error(url: &str, err: &Error) -> Self {
        Self {
            url: url.to_string(),
            title: ERROR_TITLE.to_string(),
            description: err.to_string(),
            favicon_url: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool { self.title == ERROR_TITLE }
}

/// Fetches page metadata and favicons over HTTP.
#[derive(Clone, Debug)]
pub struct MetadataFetcher {
    client: Client,

    favicon_timeout: Duration,
}

impl MetadataFetcher {
    /// # Errors
    /// Returns an error if the HTTP client can not be initialized.
    pub fn new(request_timeout: Duration, favicon_timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .context(error::BuildHttpClientSnafu)?;
        Ok(Self { client, favicon_timeout })
    }

    /// # Errors
    pub async fn try_fetch(&self, url: &str) -> Result<PageMetadata, Error> {
        let url = normalize_url(url);
        let html = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .context(error::FetchUrlSnafu { url: url.clone() })?
            .text()
            .await
            .context(error::FetchUrlSnafu { url: url.clone() })?;
        Ok(PageMetadata::from_html(&url, &html))
    }

    /// Like [`MetadataFetcher::try_fetch`], but a failure is reported in the
    /// returned metadata.
    pub async fn fetch(&self, url: &str) -> PageMetadata {
        match self.try_fetch(url).await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!("{err}");
                PageMetadata::from_error(&normalize_url(url), &err)
            }
        }
    }

    /// # Errors
    pub async fn try_fetch_favicon(&self, favicon_url: &str) -> Result<Bytes, Error> {
        self.client
            .get(favicon_url)
            .header(header::ACCEPT, "image/*")
            .timeout(self.favicon_timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .context(error::FetchUrlSnafu { url: favicon_url.to_string() })?
            .bytes()
            .await
            .context(error::FetchUrlSnafu { url: favicon_url.to_string() })
    }

    pub async fn fetch_favicon(&self, favicon_url: &str) -> Option<Bytes> {
        self.try_fetch_favicon(favicon_url)
            .await
            .map_err(|err| tracing::debug!("Favicon is not available, {err}"))
            .ok()
    }
}

fn tag_attributes<'a>(tag_regex: &Regex, html: &'a str) -> Vec<Vec<(String, &'a str)>> {
    tag_regex
        .find_iter(html)
        .map(|tag| {
            ATTRIBUTE_REGEX
                .captures_iter(tag.as_str())
                .filter_map(|caps| {
                    let name = caps.get(1)?.as_str().to_lowercase();
                    let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
                    Some((name, value.as_str()))
                })
                .collect()
        })
        .collect()
}

fn attribute<'a>(attrs: &[(String, &'a str)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(key, _)| key == name).map(|(_, value)| *value)
}

fn resolve_url(base: &str, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    Url::parse(base).and_then(|base| base.join(href)).map(String::from).ok()
}

fn collapse_whitespace(s: &str) -> String { WHITESPACE_REGEX.replace_all(s.trim(), " ").into_owned() }

/// Decodes character references in one pass, unknown names are kept.
fn decode_entities(s: &str) -> String {
    ENTITY_REGEX
        .replace_all(s, |caps: &Captures<'_>| {
            let reference = &caps[1];
            let decoded = match reference.strip_prefix('#') {
                Some(number) => {
                    let code_point = match number.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => number.parse::<u32>().ok(),
                    };
                    code_point.and_then(char::from_u32).map(String::from)
                },
                None => named_entity(reference).map(String::from),
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "middot" => "\u{b7}",
        "bull" => "\u{2022}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        _ => return None,
    };
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{decode_entities, MetadataFetcher, PageMetadata};

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <TITLE>
      Rust &amp; Friends
    </TITLE>
    <meta property="og:description" content="Open graph text">
    <meta name="Description" content=" A language empowering everyone ">
    <link rel="stylesheet" href="/style.css">
    <link rel='icon' href='/static/favicon.ico'>
  </head>
</html>"#;

    #[test]
    fn test_from_html() {
        let metadata = PageMetadata::from_html("https://www.rust-lang.org/learn", PAGE);
        assert_eq!(metadata.title, "Rust & Friends");
        assert_eq!(metadata.description, "A language empowering everyone");
        assert_eq!(
            metadata.favicon_url.as_deref(),
            Some("https://www.rust-lang.org/static/favicon.ico")
        );
        assert!(!metadata.is_error());
    }

    #[test]
    fn test_from_html_fallbacks() {
        let html = r#"<html><head>
            <meta property="og:description" content="From open graph">
            <link rel="shortcut icon" href="https://cdn.example.com/icon.png">
            </head></html>"#;
        let metadata = PageMetadata::from_html("http://example.com", html);
        assert_eq!(metadata.title, "No title");
        assert_eq!(metadata.description, "From open graph");
        assert_eq!(metadata.favicon_url.as_deref(), Some("https://cdn.example.com/icon.png"));

        let metadata = PageMetadata::from_html("http://example.com", "<html></html>");
        assert_eq!(metadata.description, "No description available");
        assert!(metadata.favicon_url.is_none());
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("Rust&#8217;s &#x2019;book&#X2019;"),
            "Rust\u{2019}s \u{2019}book\u{2019}"
        );
        assert_eq!(
            decode_entities("a &mdash; b &hellip; &copy;&nbsp;2024"),
            "a \u{2014} b \u{2026} \u{a9} 2024"
        );
        assert_eq!(decode_entities("&amp;lt; stays escaped once"), "&lt; stays escaped once");
        assert_eq!(
            decode_entities("&bogus; &#xD800; &#99999999; & ;"),
            "&bogus; &#xD800; &#99999999; & ;"
        );

        let html = "<title>Caf&#233; &ndash; Men&#xFA;</title>";
        assert_eq!(
            PageMetadata::from_html("http://example.com", html).title,
            "Caf\u{e9} \u{2013} Men\u{fa}"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let fetcher =
            MetadataFetcher::new(Duration::from_secs(5), Duration::from_secs(3)).unwrap();
        let metadata = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(metadata.is_error());
        assert_eq!(metadata.title, "Error loading preview");
        assert!(!metadata.description.is_empty());
        assert!(metadata.favicon_url.is_none());
    }
}
