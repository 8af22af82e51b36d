//! Output module for crawl results and profile reports
//!
//! This module handles:
//! - Writing the crawl result as JSON (file is overwritten)
//! - Writing the profile report as text (file is appended to)
//!
//! Either destination falls back to stdout when no path is configured.

use crate::crawler::CrawlResult;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes a crawl result as pretty JSON into `writer`
pub fn write_result_to<W: Write>(result: &CrawlResult, mut writer: W) -> OutputResult<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes the crawl result to `path` (truncating) or stdout
pub fn write_result(result: &CrawlResult, path: Option<&Path>) -> OutputResult<()> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_result_to(result, io::BufWriter::new(file))?;
            tracing::info!("Wrote crawl result to {}", path.display());
            Ok(())
        }
        None => write_result_to(result, io::stdout().lock()),
    }
}

/// Writes a rendered profile report to `path` (appending) or stdout
pub fn write_profile(report: &str, path: Option<&Path>) -> OutputResult<()> {
    match path {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(report.as_bytes())?;
            writeln!(file)?;
            tracing::info!("Appended profile report to {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
