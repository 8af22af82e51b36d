//! Profiling decorator
//!
//! [`Profiled`] forwards every call to its delegate. For operations marked
//! profiled it holds an [`InvocationTimer`] across the call; the timer
//! records when dropped, so the elapsed time lands in the ledger whether the
//! delegate returned a value, returned an error or panicked.

use crate::clock::{elapsed_between, Clock};
use crate::crawler::{self, CrawlResult, Crawler, PageParseResult, PageParser};
use crate::profiler::interface::Operation;
use crate::profiler::ledger::ProfilingLedger;
use crate::ParseError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// A delegate wrapped so its profiled operations are timed
pub struct Profiled<T> {
    delegate: T,
    delegate_type: &'static str,
    clock: Arc<dyn Clock>,
    ledger: Arc<ProfilingLedger>,
}

impl<T> Profiled<T> {
    pub(crate) fn new(delegate: T, clock: Arc<dyn Clock>, ledger: Arc<ProfilingLedger>) -> Self {
        Self {
            delegate,
            delegate_type: std::any::type_name::<T>(),
            clock,
            ledger,
        }
    }

    pub fn delegate(&self) -> &T {
        &self.delegate
    }

    pub fn into_inner(self) -> T {
        self.delegate
    }

    /// Starts timing `operation` if it is marked profiled
    fn timer(&self, operation: Operation) -> Option<InvocationTimer<'_>> {
        operation.profiled.then(|| InvocationTimer {
            clock: self.clock.as_ref(),
            ledger: &self.ledger,
            delegate_type: self.delegate_type,
            operation: operation.name,
            started: self.clock.now(),
        })
    }
}

/// Records one invocation's elapsed time when dropped
struct InvocationTimer<'a> {
    clock: &'a dyn Clock,
    ledger: &'a ProfilingLedger,
    delegate_type: &'static str,
    operation: &'static str,
    started: DateTime<Utc>,
}

impl Drop for InvocationTimer<'_> {
    fn drop(&mut self) {
        let elapsed = elapsed_between(self.started, self.clock.now());
        self.ledger
            .record(self.delegate_type, self.operation, elapsed);
    }
}

impl<T: PartialEq> PartialEq for Profiled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.delegate == other.delegate
    }
}

impl<T: Eq> Eq for Profiled<T> {}

impl<T: fmt::Debug> fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.delegate.fmt(f)
    }
}

#[async_trait]
impl<T: PageParser> PageParser for Profiled<T> {
    async fn parse(&self, url: &str) -> Result<PageParseResult, ParseError> {
        let _timer = self.timer(crawler::PARSE);
        self.delegate.parse(url).await
    }
}

#[async_trait]
impl<T: Crawler> Crawler for Profiled<T> {
    async fn crawl(&self, start_pages: &[String]) -> crate::Result<CrawlResult> {
        let _timer = self.timer(crawler::CRAWL);
        self.delegate.crawl(start_pages).await
    }

    fn max_parallelism(&self) -> usize {
        let _timer = self.timer(crawler::MAX_PARALLELISM);
        self.delegate.max_parallelism()
    }
}
