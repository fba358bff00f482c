// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Build the config, the HTTP fetcher and the crawler
// 4. Run the crawl and print a summary
// 5. Exit with proper code (0 = crawl completed, 2 = error)
//
// Pages that fail to download are logged but do not change the exit code:
// the crawl itself still completed.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use breadth_crawler::{CrawlConfig, Crawler, HtmlLinkExtractor, HttpFetcher, RunSummary};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so --json output on stdout stays machine-readable
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            seeds,
            max_depth,
            timeout,
            config,
            json,
        } => {
            let mut settings = match config {
                Some(path) => CrawlConfig::from_json_file(path)?,
                None => CrawlConfig::default(),
            };
            if let Some(max_depth) = max_depth {
                settings = settings.with_max_depth(max_depth);
            }
            if let Some(timeout) = timeout {
                settings = settings.with_timeout_secs(timeout);
            }

            handle_crawl(seeds, &settings, json).await
        }
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(seeds: Vec<String>, settings: &CrawlConfig, json: bool) -> Result<i32> {
    let fetcher = HttpFetcher::new(settings.request_timeout(), &settings.user_agent)
        .context("Failed to set up HTTP fetcher")?;

    let mut crawler = Crawler::new(seeds, settings.max_depth, fetcher, HtmlLinkExtractor::new())
        .context("Invalid crawl configuration")?;

    let summary = crawler.run().await;

    print_summary(&summary, json)?;
    Ok(0)
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("📊 Summary:");
        println!("   📄 Pages crawled: {}", summary.documents);
        println!("   ❌ Failed: {}", summary.failed);
        println!("   ⏭️  Skipped (beyond max depth): {}", summary.skipped);
        println!("   📋 Visited: {}", summary.visited);
    }
    Ok(())
}
