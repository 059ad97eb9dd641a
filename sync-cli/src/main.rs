//! # pagesync
//!
//! CLI tool for browsing a cursor-paginated list with pagesync.
//!
//! ## Commands
//!
//! - `list`: Load pages, apply local deletes, print the ordered view
//! - `config`: Print the effective configuration
//!
//! ## Example
//!
//! ```bash
//! # Browse the built-in sample data, best rated first, three pages
//! pagesync list --mock --preset best --pages 3
//!
//! # Browse a live endpoint, oldest first
//! pagesync list --url https://example.com/api/foods --order createdAt:asc
//!
//! # Use a config file
//! pagesync --config pagesync.toml list --delete 4
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagesync_client::ClientConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod sample;

use commands::{config, list};

/// CLI tool for browsing cursor-paginated lists.
#[derive(Parser, Debug)]
#[command(name = "pagesync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log fetch activity at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load pages and print the ordered list
    List(list::ListArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client_config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List(args) => {
            list::run(client_config, args).await?;
        }
        Commands::Config => {
            config::run(&client_config)?;
        }
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration file, or defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(ClientConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesync_types::ItemId;
    use std::io::Write;

    #[test]
    fn parses_list_with_flags() {
        let cli = Cli::try_parse_from([
            "pagesync", "--verbose", "list", "--mock", "--preset", "best", "--pages", "3",
            "--delete", "2", "--delete", "5",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::List(args) => {
                assert!(args.mock);
                assert_eq!(args.pages, 3);
                assert_eq!(args.delete, vec![ItemId::from(2), ItemId::from(5)]);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn order_and_preset_conflict() {
        let result = Cli::try_parse_from([
            "pagesync", "list", "--order", "rating", "--preset", "best",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_order_is_rejected_at_parse_time() {
        let result = Cli::try_parse_from(["pagesync", "list", "--order", "rating:"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[paging]\nlimit = 4").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.paging.limit, 4);
    }

    #[test]
    fn unreadable_config_names_the_path() {
        let err = load_config(Some(Path::new("/nonexistent/pagesync.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pagesync.toml"));
    }
}
