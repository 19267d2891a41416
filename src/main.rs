//! # Article API server (`article-api`)
//!
//! ```bash
//! article-api init                          # create tables
//! article-api serve                         # listen on APP_BIND (0.0.0.0:8010)
//! article-api --env-file test.env serve     # read settings from another file
//! ```
//!
//! Database settings come from `APP_DB_USERNAME`, `APP_DB_PASSWORD` and
//! `APP_DB_NAME` (see [`article_api::config`]).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use article_api::config::load_config;
use article_api::logging::init_tracing;
use article_api::{schema, server};

/// Article API: stores short tagged articles and serves tag/date summaries.
#[derive(Parser)]
#[command(name = "article-api", version, about)]
struct Cli {
    /// Dotenv file with `APP_*` settings.
    ///
    /// Defaults to `./properties.env` when that file exists. Variables set
    /// in the process environment take precedence.
    #[arg(long, global = true, env = "APP_ENV_FILE")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the `articles` and `tags` tables if missing.
    Init,

    /// Start the HTTP server.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.env_file.as_deref())?;

    match cli.command {
        Commands::Init => schema::run_init(&config).await?,
        Commands::Serve => server::run_server(&config).await?,
    }

    Ok(())
}
