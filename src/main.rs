//! Corpus Harvester main entry point
//!
//! This is the command-line interface for crawling configured sources into a
//! record stream and normalizing that stream into a Parquet corpus.

use anyhow::Context;
use clap::{Parser, Subcommand};
use corpus_harvester::config::{load_config_with_hash, Config};
use corpus_harvester::crawler::crawl;
use corpus_harvester::normalize::run_normalization;
use corpus_harvester::output::print_report;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Corpus Harvester: a polite document harvester
///
/// Crawls paginated list pages, the articles they link to, and PDFs linked
/// from those articles, while respecting robots.txt and per-source rate
/// limits. Records are appended to a JSON Lines file that the `normalize`
/// command turns into a deduplicated Parquet corpus.
#[derive(Parser, Debug)]
#[command(name = "corpus-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A polite document harvester", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every configured source into the record stream
    Crawl {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Record stream path, overriding `records-path`
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Document limit, overriding `max-docs`
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_docs: Option<u64>,

        /// Directory for raw HTML/PDF bodies, overriding `raw-dir`
        #[arg(long, value_name = "DIR")]
        save_raw_dir: Option<PathBuf>,

        /// Validate config and show what would be crawled without actually crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Filter and deduplicate a record stream into a Parquet corpus
    Normalize {
        /// Record stream to read
        #[arg(long = "in", value_name = "PATH")]
        input: PathBuf,

        /// Parquet file to write (replaced if present)
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl {
            config,
            out,
            max_docs,
            save_raw_dir,
            dry_run,
        } => {
            tracing::info!("Loading configuration from: {}", config.display());
            let (mut cfg, hash) = load_config_with_hash(&config)
                .with_context(|| format!("failed to load {}", config.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);

            if let Some(out) = out {
                cfg.output.records_path = out.to_string_lossy().into_owned();
            }
            if let Some(max_docs) = max_docs {
                cfg.crawler.max_docs = usize::try_from(max_docs).unwrap_or(usize::MAX);
            }
            if let Some(dir) = save_raw_dir {
                cfg.output.raw_dir = Some(dir.to_string_lossy().into_owned());
            }

            if dry_run {
                handle_dry_run(&cfg);
            } else {
                handle_crawl(cfg).await?;
            }
        }
        Command::Normalize { input, out } => {
            let report = run_normalization(&input, &out)
                .with_context(|| format!("failed to normalize {}", input.display()))?;
            report.print();
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("corpus_harvester=info,warn"),
            1 => EnvFilter::new("corpus_harvester=debug,info"),
            2 => EnvFilter::new("corpus_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Corpus Harvester Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max docs: {}", config.crawler.max_docs);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nRobots:");
    println!("  Policy: {:?}", config.robots.policy);
    println!("  Timeout: {}s", config.robots.timeout_secs);
    match config.robots.ttl_hours {
        Some(hours) => println!("  TTL: {}h", hours),
        None => println!("  TTL: none (cached for the whole run)"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);
    if let Some(dir) = &config.output.raw_dir {
        println!("  Raw pages: {}", dir);
    }

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!(
            "  - {} ({} start URLs, up to {} list pages each, {}s between requests)",
            source.name,
            source.start_urls.len(),
            source.max_list_pages,
            source.rate_limit_seconds
        );
        for url in &source.start_urls {
            println!("    * {}", url);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current request");
            interrupt.cancel();
        }
    });

    let records_path = config.output.records_path.clone();
    let report = crawl(config, cancel).await.context("crawl failed")?;

    print_report(&report);
    println!("Records appended to: {}", records_path);
    Ok(())
}
