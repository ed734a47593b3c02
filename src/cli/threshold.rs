use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::params::SearchParameters;
use crate::core::shape::Shape;
use crate::correction::{precompute_correction, CorrectionTable};

#[derive(Args)]
pub struct ThresholdArgs {
    /// The index the thresholds are for; correction tables are cached in
    /// its directory
    #[arg(long, required = true)]
    pub index: PathBuf,

    /// Length of the query patterns
    #[arg(long, required = true)]
    pub pattern: u64,

    /// The k-mer size. Mutually exclusive with --shape
    #[arg(long, conflicts_with = "shape", value_parser = clap::value_parser!(u32).range(1..=32))]
    pub kmer: Option<u32>,

    /// The shape to use for k-mers, as a 01-pattern. Mutually exclusive
    /// with --kmer
    #[arg(long)]
    pub shape: Option<Shape>,

    /// The window size minimizers are sampled from (defaults to the shape
    /// span)
    #[arg(long)]
    pub window: Option<u64>,

    /// The false positive rate of the index
    #[arg(long, default_value = "0.05")]
    pub fpr: f64,

    /// Maximum tolerated probability that an accepted match is spurious
    #[arg(long, default_value = "0.15")]
    pub p_max: f64,

    /// Use this threshold as-is instead of the probabilistic correction
    #[arg(long)]
    pub threshold: Option<u64>,

    /// Persist computed tables next to the index for reuse
    #[arg(long)]
    pub cache_thresholds: bool,
}

/// Default k-mer size when neither --kmer nor --shape is given.
pub const DEFAULT_KMER_SIZE: u32 = 20;

/// Execute the threshold subcommand.
///
/// # Errors
///
/// Returns an error if the parameters violate the correction contract or a
/// present cache artifact cannot be decoded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ThresholdArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let shape = match args.shape {
        Some(shape) => shape,
        None => Shape::ungapped(args.kmer.unwrap_or(DEFAULT_KMER_SIZE))?,
    };
    let window = args.window.unwrap_or_else(|| u64::from(shape.span()));

    let arguments = SearchParameters {
        pattern_size: args.pattern,
        window_size: window,
        shape,
        fpr: args.fpr,
        p_max: args.p_max,
        index_file: args.index,
        threshold: args.threshold,
        cache_thresholds: args.cache_thresholds,
    };

    if verbose {
        eprintln!(
            "Shape {shape} (span {}, weight {}), window {window}, pattern {}",
            shape.span(),
            shape.weight(),
            arguments.pattern_size,
        );
    }

    let table = precompute_correction(&arguments)?;

    match format {
        OutputFormat::Text => print_text(&arguments, &table),
        OutputFormat::Json => print_json(&arguments, &table)?,
        OutputFormat::Tsv => print_tsv(&arguments, &table),
    }

    Ok(())
}

fn print_text(arguments: &SearchParameters, table: &CorrectionTable) {
    if table.is_empty() {
        if let Some(threshold) = arguments.threshold {
            println!("Manual threshold {threshold} set; no correction applied.");
        } else {
            println!("No correction applicable.");
        }
        return;
    }

    println!(
        "Correction for {} minimizer counts ({}..={})",
        table.len(),
        arguments.minimal_minimizers(),
        arguments.maximal_minimizers(),
    );
    println!(
        "Pattern {}, window {}, shape {}, fpr {}, p_max {}",
        arguments.pattern_size, arguments.window_size, arguments.shape, arguments.fpr, arguments.p_max,
    );
    println!();
    println!("{:>10}  {:>10}", "minimizers", "correction");
    let minimal = arguments.minimal_minimizers();
    for (i, correction) in table.values().iter().enumerate() {
        println!("{:>10}  {:>10}", minimal + i as u64, correction);
    }
}

fn print_json(arguments: &SearchParameters, table: &CorrectionTable) -> anyhow::Result<()> {
    let output = if table.is_empty() {
        serde_json::json!({
            "parameters": parameters_json(arguments),
            "manual_threshold": arguments.threshold,
            "correction": [],
        })
    } else {
        serde_json::json!({
            "parameters": parameters_json(arguments),
            "minimal_minimizers": arguments.minimal_minimizers(),
            "maximal_minimizers": arguments.maximal_minimizers(),
            "correction": table.values(),
        })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parameters_json(arguments: &SearchParameters) -> serde_json::Value {
    serde_json::json!({
        "pattern_size": arguments.pattern_size,
        "window_size": arguments.window_size,
        "shape": arguments.shape.to_string(),
        "fpr": arguments.fpr,
        "p_max": arguments.p_max,
    })
}

fn print_tsv(arguments: &SearchParameters, table: &CorrectionTable) {
    println!("minimizers\tcorrection");
    let minimal = arguments.minimal_minimizers();
    for (i, correction) in table.values().iter().enumerate() {
        println!("{}\t{}", minimal + i as u64, correction);
    }
}
