//! Method-level profiler
//!
//! [`Profiler::wrap`] decorates a capability so each call to one of its
//! profiled operations is timed; the totals accumulate in a shared
//! [`ProfilingLedger`] and render as a plain-text report.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordcrawl::clock::SystemClock;
//! use wordcrawl::config::ParserConfig;
//! use wordcrawl::crawler::{HttpPageParser, PageParser};
//! use wordcrawl::profiler::Profiler;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let profiler = Profiler::new(Arc::new(SystemClock));
//! let parser = HttpPageParser::new(&ParserConfig::default())?;
//! let parser = profiler.wrap::<dyn PageParser, _>(parser)?;
//! parser.parse("https://example.com/").await?;
//! print!("{}", profiler.report());
//! # Ok(())
//! # }
//! ```
//!
//! A delegate can only be wrapped as a capability it implements:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use wordcrawl::clock::SystemClock;
//! use wordcrawl::config::ParserConfig;
//! use wordcrawl::crawler::{Crawler, HttpPageParser};
//! use wordcrawl::profiler::Profiler;
//!
//! let profiler = Profiler::new(Arc::new(SystemClock));
//! let parser = HttpPageParser::new(&ParserConfig::default()).unwrap();
//! let _ = profiler.wrap::<dyn Crawler, _>(parser);
//! ```

mod interface;
mod ledger;
mod wrapper;

pub use interface::{Implements, Interface, Operation};
pub use ledger::{format_duration, ProfilingLedger};
pub use wrapper::Profiled;

use crate::clock::Clock;
use crate::ProfilerError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Wraps capabilities and owns the ledger their timings go to
pub struct Profiler {
    clock: Arc<dyn Clock>,
    ledger: Arc<ProfilingLedger>,
    start_time: DateTime<Utc>,
}

impl Profiler {
    /// Creates a profiler; its start time is the clock's current instant
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let start_time = clock.now();
        Self {
            clock,
            ledger: Arc::new(ProfilingLedger::new()),
            start_time,
        }
    }

    /// Wraps `delegate` as an implementation of interface `I`
    ///
    /// `T` must implement `I`; the pairing is checked at compile time.
    ///
    /// # Returns
    ///
    /// * `Ok(Profiled<T>)` - Decorator implementing the same capabilities as `T`
    /// * `Err(ProfilerError::InvalidArgument)` - `I` declares no operations
    pub fn wrap<I, T>(&self, delegate: T) -> Result<Profiled<T>, ProfilerError>
    where
        I: Interface + ?Sized,
        T: Implements<I>,
    {
        if I::OPERATIONS.is_empty() {
            return Err(ProfilerError::InvalidArgument(format!(
                "{} has no operations, cannot be profiled",
                I::NAME
            )));
        }

        tracing::debug!(
            "Profiling {} as {} ({} of {} operations timed)",
            std::any::type_name::<T>(),
            I::NAME,
            I::OPERATIONS.iter().filter(|op| op.profiled).count(),
            I::OPERATIONS.len()
        );

        Ok(Profiled::new(
            delegate,
            Arc::clone(&self.clock),
            Arc::clone(&self.ledger),
        ))
    }

    pub fn ledger(&self) -> &ProfilingLedger {
        &self.ledger
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Renders the ledger with this profiler's start time
    pub fn report(&self) -> String {
        self.ledger.render(self.start_time)
    }
}
