//! Wordcrawl: a deadline-bounded concurrent word-frequency crawler
//!
//! This crate walks a page graph from a set of seed URLs, merging per-page
//! word counts into a ranked tally, and ships a small profiler that wraps any
//! capability (crawler, page parser) to time its marked operations.

pub mod clock;
pub mod config;
pub mod crawler;
pub mod output;
pub mod profiler;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Worker pool closed")]
    PoolClosed,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised by a page parser for a single URL
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Profiler errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfilerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::Config;
pub use crawler::{CrawlResult, Crawler, FailurePolicy, PageParseResult, PageParser};
pub use profiler::{Profiled, Profiler};
