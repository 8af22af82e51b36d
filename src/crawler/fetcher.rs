//! HTTP and file page parser
//!
//! [`HttpPageParser`] is the production [`PageParser`]: `http(s)` URLs are
//! fetched with a single GET, `file:` URLs are read from disk, and the body
//! goes through [`parse_document`]. There are no retries; a failed fetch is
//! reported to the crawler, whose failure policy decides what happens next.

use crate::config::{compile_word_patterns, ParserConfig};
use crate::crawler::parser::parse_document;
use crate::crawler::{PageParseResult, PageParser};
use crate::{CrawlError, ParseError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Page parser backed by reqwest and scraper
#[derive(Debug, Clone)]
pub struct HttpPageParser {
    client: Client,
    ignored_words: Vec<Regex>,
}

impl HttpPageParser {
    /// Builds the parser and its HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - Parser configuration (timeout, user agent, ignored words)
    pub fn new(config: &ParserConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(config)?;
        let ignored_words = compile_word_patterns(&config.ignored_words)?;

        Ok(Self {
            client,
            ignored_words,
        })
    }

    /// Fetches the raw document for a URL
    async fn fetch(&self, url: &Url) -> Result<String, ParseError> {
        if url.scheme() == "file" {
            let path = url.to_file_path().map_err(|_| ParseError::InvalidUrl {
                url: url.to_string(),
                message: "not a local file path".to_string(),
            })?;
            return tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ParseError::Io {
                    path: path.display().to_string(),
                    source,
                });
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ParseError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> Result<PageParseResult, ParseError> {
        let parsed_url = Url::parse(url).map_err(|e| ParseError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let body = self.fetch(&parsed_url).await?;
        Ok(parse_document(&body, &parsed_url, &self.ignored_words))
    }
}

/// Builds an HTTP client from parser configuration
pub fn build_http_client(config: &ParserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}
