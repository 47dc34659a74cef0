// SPDX-License-Identifier: MIT

//! Grounding text from a public search engine's result page

use crate::adk::error::FetchError;
use crate::raspian::config::SearchSettings;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Browser-like identification sent with every search request
pub const USER_AGENT: &str = "Mozilla/5.0";

static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("static selector is valid"));

/// Source of grounding text for a topic
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_grounding_text(&self, topic: &str) -> Result<String, FetchError>;
}

/// Fetches a search result page and keeps the text of its paragraphs.
///
/// No caching: every call is a fresh round trip.
pub struct SearchScraper {
    client: Client,
    base_url: String,
    num_results: u32,
    timeout: Duration,
}

impl SearchScraper {
    pub fn new(client: Client, settings: &SearchSettings) -> Self {
        Self {
            client,
            base_url: settings.url.clone(),
            num_results: settings.num_results,
            timeout: settings.timeout,
        }
    }

    /// `{base}?q={topic}&num={n}`, with the topic form-encoded
    pub fn search_url(&self, topic: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("q", topic)
            .append_pair("num", &self.num_results.to_string());
        Ok(url)
    }

    async fn fetch(&self, topic: &str) -> Result<String, FetchError> {
        let url = self.search_url(topic)?;
        log::debug!("Fetching search results from {}", url);

        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = resp.text().await?;
        extract_paragraph_text(&body)
    }
}

#[async_trait]
impl ContentFetcher for SearchScraper {
    async fn fetch_grounding_text(&self, topic: &str) -> Result<String, FetchError> {
        self.fetch(topic).await.map_err(|e| {
            log::debug!("Search fetch for '{}' failed: {}", topic, e);
            e
        })
    }
}

/// Text of every `<p>` element, joined by single spaces.
///
/// Each paragraph contributes all of its descendant text as-is. A document
/// without any paragraph is an error rather than an empty string.
pub fn extract_paragraph_text(html: &str) -> Result<String, FetchError> {
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect();

    if paragraphs.is_empty() {
        return Err(FetchError::NoContent);
    }

    Ok(paragraphs.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper_for(url: &str) -> SearchScraper {
        SearchScraper::new(
            Client::new(),
            &SearchSettings {
                url: url.to_string(),
                ..SearchSettings::default()
            },
        )
    }

    #[test]
    fn test_extract_joins_paragraphs_with_single_space() {
        let html = "<html><body><p>First</p><div><p>Second</p></div><p>Third</p></body></html>";
        assert_eq!(extract_paragraph_text(html).unwrap(), "First Second Third");
    }

    #[test]
    fn test_extract_includes_nested_text() {
        let html = "<p>Rust is <b>fast</b> and <a href='#'>safe</a>.</p>";
        assert_eq!(extract_paragraph_text(html).unwrap(), "Rust is fast and safe.");
    }

    #[test]
    fn test_extract_ignores_text_outside_paragraphs() {
        let html = "<body><h1>Heading</h1><span>aside</span><p>Body</p></body>";
        assert_eq!(extract_paragraph_text(html).unwrap(), "Body");
    }

    #[test]
    fn test_extract_keeps_empty_paragraphs() {
        let html = "<p>One</p><p></p><p>Two</p>";
        assert_eq!(extract_paragraph_text(html).unwrap(), "One  Two");
    }

    #[test]
    fn test_extract_without_paragraphs_fails() {
        let err = extract_paragraph_text("<html><body><div>no paragraphs</div></body></html>")
            .unwrap_err();
        assert!(matches!(err, FetchError::NoContent));
        assert!(err.to_string().contains("No content found on the page."));
    }

    #[test]
    fn test_extract_empty_document_fails() {
        assert!(matches!(
            extract_paragraph_text(""),
            Err(FetchError::NoContent)
        ));
    }

    #[test]
    fn test_search_url_encodes_topic() {
        let url = scraper_for("https://www.google.com/search")
            .search_url("Rust & WebAssembly")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/search?q=Rust+%26+WebAssembly&num=5"
        );
    }

    #[test]
    fn test_search_url_rejects_invalid_base() {
        let err = scraper_for("not a url").search_url("rust").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
