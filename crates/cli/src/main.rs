//! advent CLI
//!
//! Local front-end for checking numbers and priming the cache. Reads the same
//! configuration as the server; `--cache-db` enables the local SQLite cache.

use std::path::PathBuf;
use std::sync::Arc;

use advent_client::{Cache, FetchClient, FetchConfig, Fetcher};
use advent_core::AppConfig;
use advent_core::cache::DAILY_CACHE_KEY;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod output;

/// Advent calendar lottery checker
#[derive(Parser, Debug)]
#[command(name = "advent", version, about = "Check advent calendar lottery numbers")]
struct Cli {
    /// Override the calendar landing page URL
    #[arg(long, global = true)]
    origin: Option<String>,

    /// SQLite file used as cache when no remote cache is configured
    #[arg(long, global = true)]
    cache_db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a ticket number has won
    Check {
        /// Ticket number (digits only)
        number: String,
    },

    /// List the days drawn so far
    Days {
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Show the prize table of one window
    Prizes {
        /// Window token, e.g. window-3
        window: String,

        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Scrape the origin now and overwrite the cache
    InitCache {
        /// Also refresh every day's prize table
        #[arg(long)]
        prizes: bool,
    },

    /// Show what the daily cache currently holds
    Status,

    /// Delete expired entries from the local cache
    Purge,
}

/// Logs go to stderr so stdout stays clean for results.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load().context("failed to load configuration")?;
    if let Some(origin) = cli.origin {
        config.origin_url = origin;
    }
    if let Some(path) = cli.cache_db {
        config.cache_db_path = Some(path);
    }

    let origin = FetchClient::new(FetchConfig::from(&config)).context("failed to build origin client")?;
    let fetcher = Fetcher::new(Arc::new(origin), Arc::new(Cache::from_config(&config)));

    match cli.command {
        Command::Check { number } => {
            let result = fetcher.check_number(&number).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                print!("{}", output::check_result(&result));
            }
        }

        Command::Days { refresh } => {
            let Some(data) = fetcher.fetch_daily_data(refresh).await else {
                bail!("Could not fetch data");
            };
            if cli.json {
                print_json(&data)?;
            } else {
                print!("{}", output::days(&data));
            }
        }

        Command::Prizes { window, refresh } => {
            let prizes = fetcher.fetch_prize_data(&window, refresh).await.unwrap_or_default();
            if cli.json {
                print_json(&prizes)?;
            } else {
                print!("{}", output::prizes(&window, &prizes));
            }
        }

        Command::InitCache { prizes } => {
            let Some(data) = fetcher.fetch_daily_data(true).await else {
                bail!("Could not fetch data");
            };

            let primed = if prizes { fetcher.prime_prizes(&data).await } else { Vec::new() };

            if cli.json {
                print_json(&serde_json::json!({ "daily": data, "prizes": primed }))?;
            } else {
                print!("{}", output::init_cache(&data, &primed, fetcher.cache().backend_name().await));
            }
        }

        Command::Status => {
            let data = fetcher.cached_daily_data().await;
            let entry = fetcher.cache().entry(DAILY_CACHE_KEY).await;
            if cli.json {
                print_json(&serde_json::json!({ "daily": data, "entry": entry }))?;
            } else {
                print!(
                    "{}",
                    output::status(data.as_ref(), entry.as_ref(), fetcher.cache().backend_name().await)
                );
            }
        }

        Command::Purge => {
            let purged = fetcher.cache().purge_expired().await;
            if cli.json {
                print_json(&serde_json::json!({ "purged": purged }))?;
            } else {
                println!("purged {purged} expired entries ({})", fetcher.cache().backend_name().await);
            }
        }
    }

    Ok(())
}
