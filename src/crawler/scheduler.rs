//! Parallel crawl scheduler
//!
//! Every URL becomes a task that parses the page, merges its words into a
//! shared tally and spawns one child task per outbound link. A task finishes
//! only once all of its children have, so a crawl is done when its root
//! tasks are.
//!
//! Limits:
//! - Depth: each hop decrements the remaining depth; zero stops the branch
//! - Deadline: sampled when a task starts; running parser calls are never
//!   interrupted, but no new one begins once the deadline has passed
//! - Ignored URLs: a URL fully matching an ignored pattern is skipped
//! - Parallelism: a semaphore caps concurrent parser calls at
//!   `min(parallelism, available hardware parallelism)`

use crate::clock::{add_saturating, Clock};
use crate::config::{compile_url_patterns, CrawlerConfig};
use crate::crawler::words::{merge, top_words};
use crate::crawler::{CrawlResult, Crawler, FailurePolicy, PageParser};
use crate::{ConfigError, CrawlError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Crawl limits, with ignored-URL patterns already compiled
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub timeout: Duration,
    pub popular_word_count: usize,
    pub parallelism: usize,
    pub ignored_urls: Vec<Regex>,
    pub max_depth: u32,
    pub failure_policy: FailurePolicy,
}

impl CrawlSettings {
    /// Builds settings from configuration, compiling the ignored-URL patterns
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            timeout: Duration::from_secs(config.timeout_seconds),
            popular_word_count: config.popular_word_count,
            parallelism: config.parallelism,
            ignored_urls: compile_url_patterns(&config.ignored_urls)?,
            max_depth: config.max_depth,
            failure_policy: config.on_parse_failure,
        })
    }

    /// Requested parallelism capped by what the machine offers
    pub fn effective_parallelism(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.parallelism.min(available).max(1)
    }
}

/// One unit of recursive crawl work
#[derive(Debug, Clone)]
struct CrawlTask {
    url: String,
    depth_remaining: u32,
    deadline: DateTime<Utc>,
}

/// State shared by every task of a single crawl invocation
struct CrawlContext {
    parser: Arc<dyn PageParser>,
    clock: Arc<dyn Clock>,
    ignored_urls: Arc<[Regex]>,
    failure_policy: FailurePolicy,
    permits: Arc<Semaphore>,
    visited: DashSet<String>,
    counts: DashMap<String, u64>,
}

impl CrawlContext {
    fn is_ignored(&self, url: &str) -> bool {
        self.ignored_urls.iter().any(|pattern| pattern.is_match(url))
    }
}

/// Crawler that fans out over a tokio runtime
pub struct ParallelCrawler {
    parser: Arc<dyn PageParser>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    popular_word_count: usize,
    max_depth: u32,
    failure_policy: FailurePolicy,
    ignored_urls: Arc<[Regex]>,
    parallelism: usize,
    permits: Arc<Semaphore>,
}

impl ParallelCrawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `settings` - Crawl limits
    /// * `parser` - Page parser invoked once per visited URL
    /// * `clock` - Time source for the deadline
    pub fn new(settings: CrawlSettings, parser: Arc<dyn PageParser>, clock: Arc<dyn Clock>) -> Self {
        let parallelism = settings.effective_parallelism();

        Self {
            parser,
            clock,
            timeout: settings.timeout,
            popular_word_count: settings.popular_word_count,
            max_depth: settings.max_depth,
            failure_policy: settings.failure_policy,
            ignored_urls: settings.ignored_urls.into(),
            parallelism,
            permits: Arc::new(Semaphore::new(parallelism)),
        }
    }
}

#[async_trait]
impl Crawler for ParallelCrawler {
    async fn crawl(&self, start_pages: &[String]) -> crate::Result<CrawlResult> {
        let deadline = add_saturating(self.clock.now(), self.timeout);
        tracing::info!(
            "Crawling {} start pages (max depth {}, {} workers, deadline {})",
            start_pages.len(),
            self.max_depth,
            self.parallelism,
            deadline
        );

        let ctx = Arc::new(CrawlContext {
            parser: Arc::clone(&self.parser),
            clock: Arc::clone(&self.clock),
            ignored_urls: Arc::clone(&self.ignored_urls),
            failure_policy: self.failure_policy,
            permits: Arc::clone(&self.permits),
            visited: DashSet::new(),
            counts: DashMap::new(),
        });

        let mut roots = JoinSet::new();
        for url in start_pages {
            roots.spawn(execute(
                Arc::clone(&ctx),
                CrawlTask {
                    url: url.clone(),
                    depth_remaining: self.max_depth,
                    deadline,
                },
            ));
        }
        drain(&mut roots).await?;

        let urls_visited = ctx.visited.len();
        let counts: HashMap<String, u64> = ctx
            .counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        let word_counts = if counts.is_empty() {
            Vec::new()
        } else {
            top_words(&counts, self.popular_word_count)
        };

        tracing::info!(
            "Crawl finished: {} urls visited, {} distinct words",
            urls_visited,
            counts.len()
        );

        Ok(CrawlResult {
            word_counts,
            urls_visited,
        })
    }

    fn max_parallelism(&self) -> usize {
        self.parallelism
    }
}

/// Runs one task and, transitively, its whole subtree
fn execute(ctx: Arc<CrawlContext>, task: CrawlTask) -> BoxFuture<'static, crate::Result<()>> {
    async move {
        if task.depth_remaining == 0 || ctx.clock.now() >= task.deadline {
            return Ok(());
        }

        if ctx.is_ignored(&task.url) {
            tracing::trace!("Ignoring {}", task.url);
            return Ok(());
        }

        if !ctx.visited.insert(task.url.clone()) {
            return Ok(());
        }

        let parsed = {
            let _permit = ctx
                .permits
                .acquire()
                .await
                .map_err(|_| CrawlError::PoolClosed)?;
            ctx.parser.parse(&task.url).await
        };

        let page = match parsed {
            Ok(page) => page,
            Err(source) => match ctx.failure_policy {
                FailurePolicy::Abort => {
                    return Err(CrawlError::Parse {
                        url: task.url,
                        source,
                    })
                }
                FailurePolicy::Skip => {
                    tracing::warn!("Skipping {}: {}", task.url, source);
                    return Ok(());
                }
            },
        };

        tracing::debug!(
            "Parsed {} ({} words, {} links, depth remaining {})",
            task.url,
            page.word_counts.len(),
            page.links.len(),
            task.depth_remaining
        );

        merge(&ctx.counts, &page.word_counts);

        let mut children = JoinSet::new();
        for link in page.links {
            children.spawn(execute(
                Arc::clone(&ctx),
                CrawlTask {
                    url: link,
                    depth_remaining: task.depth_remaining - 1,
                    deadline: task.deadline,
                },
            ));
        }
        drain(&mut children).await
    }
    .boxed()
}

/// Waits for every task in the set, failing on the first error
///
/// On error the set is dropped by the caller, which aborts the rest.
async fn drain(tasks: &mut JoinSet<crate::Result<()>>) -> crate::Result<()> {
    while let Some(joined) = tasks.join_next().await {
        joined??;
    }
    Ok(())
}
