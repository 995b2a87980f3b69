use clap::Parser;

use super::*;

#[test]
fn parses_lookup_command() {
    let cli = Cli::try_parse_from(["platewise-cli", "lookup", "ChIJ_valid_id"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Lookup { ref restaurant } if restaurant == "ChIJ_valid_id"
    ));
}

#[test]
fn parses_lookup_by_quoted_name() {
    let cli = Cli::try_parse_from(["platewise-cli", "lookup", "Trattoria Roma"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Lookup { ref restaurant } if restaurant == "Trattoria Roma"
    ));
}

#[test]
fn parses_compare_command() {
    let cli = Cli::try_parse_from(["platewise-cli", "compare", "ChIJ_a", "ChIJ_b"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Compare { first, second } => {
            assert_eq!(first, "ChIJ_a");
            assert_eq!(second, "ChIJ_b");
        }
        other => panic!("expected compare, got {other:?}"),
    }
}

#[test]
fn compare_requires_two_restaurants() {
    assert!(Cli::try_parse_from(["platewise-cli", "compare", "ChIJ_a"]).is_err());
}

#[test]
fn parses_purge_cache_command() {
    let cli =
        Cli::try_parse_from(["platewise-cli", "purge-cache"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::PurgeCache));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["platewise-cli"]).is_err());
}

#[tokio::test]
async fn purge_cache_on_empty_memory_cache_succeeds() {
    let cache = platewise_db::MemoryCache::new(None);
    commands::run_purge_cache(&cache)
        .await
        .expect("purge should succeed");
}
