//! Wordcrawl main entry point
//!
//! This is the command-line interface for the Wordcrawl word-frequency crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wordcrawl::clock::{Clock, SystemClock};
use wordcrawl::config::{load_config_with_hash, Config};
use wordcrawl::crawler::{CrawlSettings, Crawler, HttpPageParser, PageParser, ParallelCrawler};
use wordcrawl::output::{write_profile, write_result};
use wordcrawl::profiler::Profiler;

/// Wordcrawl: a deadline-bounded concurrent word-frequency crawler
///
/// Wordcrawl follows links from the configured start pages up to a maximum
/// depth and time budget, and reports the most popular words it saw along
/// with a timing profile of the crawl.
#[derive(Parser, Debug)]
#[command(name = "wordcrawl")]
#[command(version)]
#[command(about = "A deadline-bounded concurrent word-frequency crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let settings = CrawlSettings::from_config(&config.crawler)?;

    if cli.dry_run {
        handle_dry_run(&config, &settings);
        return Ok(());
    }

    // The worker pool belongs to this invocation and is shut down with it
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(settings.effective_parallelism())
        .enable_all()
        .build()
        .context("failed to start worker pool")?;

    runtime.block_on(handle_crawl(config, settings))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wordcrawl=info,warn"),
            1 => EnvFilter::new("wordcrawl=debug,info"),
            2 => EnvFilter::new("wordcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, settings: &CrawlSettings) {
    println!("=== Wordcrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!(
        "  Parallelism: {} requested, {} effective",
        config.crawler.parallelism,
        settings.effective_parallelism()
    );
    println!("  Popular words kept: {}", config.crawler.popular_word_count);
    println!("  On parse failure: {:?}", config.crawler.on_parse_failure);

    println!("\nIgnored URLs ({}):", config.crawler.ignored_urls.len());
    for pattern in &config.crawler.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored Words ({}):", config.parser.ignored_words.len());
    for pattern in &config.parser.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\nOutput:");
    println!(
        "  Result: {}",
        config.output.result_path.as_deref().unwrap_or("<stdout>")
    );
    println!(
        "  Profile: {}",
        config.output.profile_output_path.as_deref().unwrap_or("<stdout>")
    );

    println!("\nStart Pages ({}):", config.crawler.start_pages.len());
    for page in &config.crawler.start_pages {
        println!("  * {}", page);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, settings: CrawlSettings) -> anyhow::Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let profiler = Profiler::new(Arc::clone(&clock));

    let parser = profiler.wrap::<dyn PageParser, _>(HttpPageParser::new(&config.parser)?)?;
    let crawler = profiler.wrap::<dyn Crawler, _>(ParallelCrawler::new(
        settings,
        Arc::new(parser),
        clock,
    ))?;

    let result = match crawler.crawl(&config.crawler.start_pages).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Visited {} urls using {} workers",
        result.urls_visited,
        crawler.max_parallelism()
    );

    let result_path = config.output.result_path.as_deref().map(Path::new);
    let profile_path = config.output.profile_output_path.as_deref().map(Path::new);

    write_result(&result, result_path)?;
    write_profile(&profiler.report(), profile_path)?;

    Ok(())
}
