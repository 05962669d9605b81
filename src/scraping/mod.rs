// src/scraping/mod.rs
//! Listing-page scraping.
//!
//! Each site gets its own `ListingStrategy` that owns its selectors, so a
//! markup change on one site touches one file. Strategies are pure HTML →
//! entries; fetching goes through `PageFetcher`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use scraper::{ElementRef, Selector};
use std::collections::BTreeMap;

use crate::app_log;
use crate::error::{AdvisorError, Result};

pub mod courses;
pub mod jobs;
pub mod programs;

pub use courses::CourseListing;
pub use jobs::JobListing;
pub use programs::ProgramListing;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of a successful response; any other status or a network failure is `Fetch`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait ListingStrategy {
    type Entry;

    /// Maximum entries kept from one page; `None` keeps whatever the page lists.
    fn cap(&self) -> Option<usize>;

    /// Entries in page order, truncated to `cap`.
    fn parse_listing(&self, html: &str) -> Vec<Self::Entry>;
}

/// Browser-like headers go only to URLs under `header_scope` (the job site);
/// every other site gets a plain request.
pub struct HttpFetcher {
    client: Client,
    browser_headers: HeaderMap,
    header_scope: String,
}

impl HttpFetcher {
    pub fn new(headers: &BTreeMap<String, String>, header_scope: &str) -> Result<Self> {
        let mut browser_headers = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AdvisorError::Config(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AdvisorError::Config(format!("invalid header value for {}: {}", name, e)))?;
            browser_headers.insert(name, value);
        }

        let client = Client::builder()
            .build()
            .map_err(|e| AdvisorError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            browser_headers,
            header_scope: header_scope.trim_end_matches('/').to_string(),
        })
    }

    fn headers_for(&self, url: &str) -> Option<&HeaderMap> {
        let under_scope = !self.header_scope.is_empty()
            && url.starts_with(&self.header_scope)
            && matches!(url[self.header_scope.len()..].chars().next(), None | Some('/' | '?' | '#'));
        under_scope.then_some(&self.browser_headers)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        app_log!(info, "Fetching page: {}", url);

        let mut request = self.client.get(url);
        if let Some(headers) = self.headers_for(url) {
            request = request.headers(headers.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdvisorError::fetch(url, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            app_log!(warn, "HTTP error {} for {}", status, url);
            return Err(AdvisorError::fetch(
                url,
                Some(status.as_u16()),
                format!("HTTP error: {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| AdvisorError::fetch(url, Some(status.as_u16()), e.to_string()))
    }
}

/// First element under `scope` matching `css`. Unparseable selectors match nothing.
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

pub(crate) fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// All descendant text, trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the element's direct text-node children only.
pub(crate) fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| &**text))
        .collect::<String>()
}

/// True when the element holds a single run of text and no child elements.
pub(crate) fn is_text_only(element: ElementRef<'_>) -> bool {
    !element.children().any(|child| child.value().is_element())
}

pub(crate) fn text_or(element: Option<ElementRef<'_>>, sentinel: &str) -> String {
    element
        .map(element_text)
        .unwrap_or_else(|| sentinel.to_string())
}

/// Resolve a site-relative href against `base`.
pub(crate) fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base.trim_end_matches('/'), href)
    }
}
