use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::correction::cache::ThresholdCache;

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// List cached correction tables next to an index
    List {
        /// The index whose cache directory to inspect
        #[arg(long, required = true)]
        index: PathBuf,
    },

    /// Remove all cached correction tables next to an index
    Clear {
        /// The index whose cache directory to clear
        #[arg(long, required = true)]
        index: PathBuf,
    },
}

/// One listed artifact.
struct CacheEntry {
    name: String,
    entries: Option<usize>,
    modified: Option<DateTime<Local>>,
}

/// Execute the cache subcommand.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be listed or an artifact
/// cannot be removed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CacheArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CacheCommand::List { index } => list(&index, format, verbose),
        CacheCommand::Clear { index } => clear(&index, verbose),
    }
}

fn cache_for(index: &Path) -> ThresholdCache {
    ThresholdCache::new(index.parent().unwrap_or_else(|| Path::new(".")))
}

fn list(index: &Path, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let cache = cache_for(index);
    let paths = cache.entries()?;

    if verbose {
        eprintln!(
            "Found {} correction artifact(s) in {}",
            paths.len(),
            cache.dir().display()
        );
    }

    let entries: Vec<CacheEntry> = paths.iter().map(|path| inspect(path)).collect();

    match format {
        OutputFormat::Text => print_text(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Tsv => print_tsv(&entries),
    }

    Ok(())
}

fn clear(index: &Path, verbose: bool) -> anyhow::Result<()> {
    let cache = cache_for(index);
    let paths = cache.entries()?;
    for path in &paths {
        fs::remove_file(path)?;
        if verbose {
            eprintln!("Removed {}", path.display());
        }
    }
    println!("Removed {} correction artifact(s).", paths.len());
    Ok(())
}

fn inspect(path: &Path) -> CacheEntry {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    // An undecodable artifact is still listed; it just has no entry count
    let entries = fs::read(path)
        .ok()
        .and_then(|bytes| bincode::deserialize::<Vec<u64>>(&bytes).ok())
        .map(|values| values.len());

    let modified = fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .map(DateTime::<Local>::from);

    CacheEntry { name, entries, modified }
}

fn print_text(entries: &[CacheEntry]) {
    if entries.is_empty() {
        println!("No cached correction tables.");
        return;
    }
    for entry in entries {
        let count = entry
            .entries
            .map_or_else(|| "unreadable".to_string(), |n| format!("{n} entries"));
        let modified = entry
            .modified
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        println!("{}  {count}  {modified}", entry.name);
    }
}

fn print_json(entries: &[CacheEntry]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "name": entry.name,
                "entries": entry.entries,
                "modified": entry.modified.map(|t| t.to_rfc3339()),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(entries: &[CacheEntry]) {
    println!("name\tentries\tmodified");
    for entry in entries {
        println!(
            "{}\t{}\t{}",
            entry.name,
            entry.entries.map_or_else(|| "-".to_string(), |n| n.to_string()),
            entry
                .modified
                .map_or_else(|| "-".to_string(), |t| t.to_rfc3339()),
        );
    }
}
