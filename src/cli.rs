// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use clap's "derive" API: the CLI structure is described by structs and
// enums, and clap generates the parsing, --help and --version for us.
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "breadth-crawler",
    version,
    about = "A breadth-first web crawler",
    long_about = "breadth-crawler starts from one or more seed URLs, follows links breadth-first \
                  up to a maximum depth, and reports how many pages it collected."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl outward from one or more seed URLs
    ///
    /// Example: breadth-crawler crawl https://example.com --max-depth 2
    Crawl {
        /// Seed URLs (depth 0)
        #[arg(required = true)]
        seeds: Vec<String>,

        /// Maximum number of link-hops from a seed that are still fetched
        ///
        /// Depth 0 = just the seeds
        /// Depth 1 = seeds + every page they link to
        /// etc. Defaults to 2 (or the value in --config).
        #[arg(long, allow_negative_numbers = true)]
        max_depth: Option<i64>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// JSON config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the run summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
