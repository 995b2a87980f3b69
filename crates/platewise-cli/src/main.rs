mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "platewise-cli")]
#[command(about = "Look up, compare and cache restaurant reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the fused detail for a restaurant (place id or name)
    Lookup {
        /// Google place id (`ChIJ...`) or restaurant name
        restaurant: String,
    },
    /// Compare two restaurants and print a recommendation
    Compare {
        /// First restaurant (place id or name)
        first: String,
        /// Second restaurant (place id or name)
        second: String,
    },
    /// Delete expired entries from the restaurant cache
    PurgeCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = platewise_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cache = platewise_db::open_cache(&config).await?;

    match cli.command {
        Commands::Lookup { restaurant } => {
            commands::run_lookup(&config, cache, &restaurant).await
        }
        Commands::Compare { first, second } => {
            commands::run_compare(&config, cache, &first, &second).await
        }
        Commands::PurgeCache => commands::run_purge_cache(cache.as_ref()).await,
    }
}

#[cfg(test)]
mod tests;
