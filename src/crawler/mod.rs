//! Crawler module for concurrent word-frequency crawling
//!
//! This module contains:
//! - The [`Crawler`] and [`PageParser`] capabilities and their profiling markers
//! - A parallel, depth- and deadline-bounded crawl scheduler
//! - Word count merging and ranking
//! - An HTTP/file page parser built on reqwest and scraper

mod fetcher;
mod parser;
mod scheduler;
pub mod words;

pub use fetcher::HttpPageParser;
pub use parser::{parse_document, resolve_link};
pub use scheduler::{CrawlSettings, ParallelCrawler};

use crate::profiler::{Implements, Interface, Operation};
use crate::ParseError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Words and outbound links extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParseResult {
    /// Occurrences of each word on the page
    pub word_counts: HashMap<String, u64>,

    /// Outbound links, in document order
    pub links: Vec<String>,
}

/// Outcome of one crawl invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Most popular words, best first, truncated to the configured count
    #[serde(serialize_with = "serialize_ranked")]
    pub word_counts: Vec<(String, u64)>,

    /// Number of distinct URLs that were handed to the page parser
    pub urls_visited: usize,
}

fn serialize_ranked<S: Serializer>(words: &[(String, u64)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(words.iter().map(|(word, count)| (word, count)))
}

/// What a page parser failure does to the crawl it happens in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole crawl with the parser's error
    #[default]
    Abort,

    /// Log the failure and stop expanding that branch
    Skip,
}

/// Extracts word counts and links for a URL
#[async_trait]
pub trait PageParser: Send + Sync {
    async fn parse(&self, url: &str) -> Result<PageParseResult, ParseError>;
}

pub const PARSE: Operation = Operation::profiled("parse");

impl Interface for dyn PageParser {
    const NAME: &'static str = "PageParser";
    const OPERATIONS: &'static [Operation] = &[PARSE];
}

impl<T: PageParser> Implements<dyn PageParser> for T {}

/// Crawls from a set of start pages and reports popular words
#[async_trait]
pub trait Crawler: Send + Sync {
    async fn crawl(&self, start_pages: &[String]) -> crate::Result<CrawlResult>;

    /// Number of workers this crawler actually uses
    fn max_parallelism(&self) -> usize;
}

pub const CRAWL: Operation = Operation::profiled("crawl");
pub const MAX_PARALLELISM: Operation = Operation::unprofiled("max_parallelism");

impl Interface for dyn Crawler {
    const NAME: &'static str = "Crawler";
    const OPERATIONS: &'static [Operation] = &[CRAWL, MAX_PARALLELISM];
}

impl<T: Crawler> Implements<dyn Crawler> for T {}
