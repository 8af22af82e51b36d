use crate::config::types::{Config, CrawlerConfig, ParserConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_parser_config(&config.parser)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "parallelism must be >= 1, got {}",
            config.parallelism
        )));
    }

    for page in &config.start_pages {
        Url::parse(page).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start page '{}': {}", page, e))
        })?;
    }

    compile_url_patterns(&config.ignored_urls)?;

    Ok(())
}

/// Validates page parser configuration
fn validate_parser_config(config: &ParserConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "parser timeout_seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    compile_word_patterns(&config.ignored_words)?;

    Ok(())
}

/// Compiles ignored-URL patterns
///
/// Each pattern must match the whole URL, so it is anchored on both ends.
pub fn compile_url_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| compile(pattern, &format!("^(?:{})$", pattern)))
        .collect()
}

/// Compiles ignored-word patterns (unanchored, as written)
pub fn compile_word_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| compile(pattern, pattern))
        .collect()
}

fn compile(original: &str, source: &str) -> Result<Regex, ConfigError> {
    Regex::new(source)
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", original, e)))
}
