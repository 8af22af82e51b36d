//! HTML parser for extracting words and links
//!
//! This module handles parsing HTML content to extract:
//! - Words from visible body text, counted per page
//! - Links to follow (from <a> tags)

use crate::crawler::PageParseResult;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Elements whose text is never counted
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses an HTML document into word counts and outbound links
///
/// # Word Extraction Rules
///
/// - Only text inside `<body>` is read; `script`, `style`, `noscript` and
///   `template` contents are skipped
/// - Text is split on whitespace, lowercased and stripped of every
///   non-alphanumeric character
/// - Empty tokens and tokens matching any `ignored_words` pattern are dropped
///
/// # Link Extraction Rules
///
/// See [`resolve_link`]. Links are returned in document order.
///
/// # Example
///
/// ```
/// use wordcrawl::crawler::parse_document;
/// use url::Url;
///
/// let html = r#"<html><body><p>Hello, hello world!</p><a href="/next">Next</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_document(html, &base_url, &[]);
/// assert_eq!(page.word_counts.get("hello"), Some(&2));
/// assert_eq!(page.links, vec!["https://example.com/next".to_string()]);
/// ```
pub fn parse_document(html: &str, base_url: &Url, ignored_words: &[Regex]) -> PageParseResult {
    let document = Html::parse_document(html);

    PageParseResult {
        word_counts: extract_words(&document, ignored_words),
        links: extract_links(&document, base_url),
    }
}

/// Counts words in the document body
fn extract_words(document: &Html, ignored_words: &[Regex]) -> HashMap<String, u64> {
    let mut counts = HashMap::new();

    let Ok(body_selector) = Selector::parse("body") else {
        return counts;
    };

    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };

            let skipped = node
                .ancestors()
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|element| SKIPPED_ELEMENTS.contains(&element.name()));
            if skipped {
                continue;
            }

            for token in text.split_whitespace() {
                let word: String = token
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .flat_map(char::to_lowercase)
                    .collect();

                if word.is_empty() || ignored_words.iter().any(|pattern| pattern.is_match(&word)) {
                    continue;
                }

                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }

    counts
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Anything other than http(s) after resolution, except that pages
///   loaded from `file:` may link to other `file:` pages
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        "file" if base_url.scheme() == "file" => Some(absolute_url.to_string()),
        _ => None,
    }
}
