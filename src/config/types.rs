use crate::crawler::FailurePolicy;
use serde::Deserialize;

/// Main configuration structure for Wordcrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URLs the crawl starts from
    #[serde(default)]
    pub start_pages: Vec<String>,

    /// Regular expressions; a URL fully matching any of them is never visited
    #[serde(default)]
    pub ignored_urls: Vec<String>,

    /// Requested worker count, capped by the available hardware parallelism
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Maximum number of hops from a start page
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Wall-clock budget for the whole crawl, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Number of ranked words kept in the result
    #[serde(default = "default_popular_word_count")]
    pub popular_word_count: usize,

    /// What a failing page does to the rest of the crawl
    #[serde(default)]
    pub on_parse_failure: FailurePolicy,
}

/// Page parser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParserConfig {
    /// Regular expressions; words matching any of them are not counted
    #[serde(default)]
    pub ignored_words: Vec<String>,

    /// Per-page fetch timeout, in seconds
    #[serde(default = "default_parser_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            ignored_words: Vec::new(),
            timeout_seconds: default_parser_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration; absent paths mean stdout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where the JSON crawl result is written (overwritten)
    pub result_path: Option<String>,

    /// Where the profile report is written (appended)
    pub profile_output_path: Option<String>,
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_max_depth() -> u32 {
    10
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_popular_word_count() -> usize {
    10
}

fn default_parser_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("wordcrawl/{}", env!("CARGO_PKG_VERSION"))
}
