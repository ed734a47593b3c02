use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod correction;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("minthresh=debug,info")
    } else {
        EnvFilter::new("minthresh=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Threshold(args) => {
            cli::threshold::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Cache(args) => {
            cli::cache::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
