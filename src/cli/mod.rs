//! Command-line interface for minthresh.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **threshold**: Compute the correction table for a parameter set
//! - **cache**: List or clear cached correction tables next to an index
//!
//! ## Usage
//!
//! ```text
//! # Correction table for 50 bp patterns, 19-mers in 23 bp windows
//! minthresh threshold --index genomes.index --pattern 50 --kmer 19 --window 23
//!
//! # Gapped shape, persisted next to the index for reuse
//! minthresh threshold --index genomes.index --pattern 100 --shape 11011 --window 8 --cache-thresholds
//!
//! # JSON output for scripting
//! minthresh threshold --index genomes.index --pattern 50 --kmer 19 --window 23 --format json
//!
//! # Inspect the cache
//! minthresh cache list --index genomes.index
//! ```

use clap::{Parser, Subcommand};

pub mod cache;
pub mod threshold;

#[derive(Parser)]
#[command(name = "minthresh")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Compute false-positive-corrected minimizer thresholds for probabilistic k-mer indexes")]
#[command(
    long_about = "minthresh derives how many minimizer matches a search against a probabilistic (Bloom-filter family) k-mer index should discount before accepting a window as a true hit.\n\nEach index lookup has a false positive rate, so windows accumulate spurious matches by chance alone. For every possible minimizer count, minthresh finds the largest number of false positives that is still statistically plausible and tabulates it as a correction. Tables are cached next to the index and reused for identical parameters."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the threshold correction table for a parameter set
    Threshold(threshold::ThresholdArgs),

    /// Manage cached correction tables
    Cache(cache::CacheArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
