//! empdir-admin - Employee directory database management
//!
//! Without a subcommand an interactive menu runs. Subcommands perform a single
//! operation and exit, with a non-zero status if it failed.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use console::Term;
use empdir_admin::menu::Menu;
use empdir_admin::ops::{self, Outcome};
use empdir_admin::populate::PopulateRequest;
use empdir_common::config::{Config, ConfigOverrides};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "empdir-admin")]
#[command(about = "Create, drop, reset and populate the employee directory database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, value_name = "FILE", global = true)]
    database: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the employee table if missing
    Create,

    /// Drop all application tables
    Drop,

    /// Import rows from a CSV file
    Populate {
        /// CSV file with a header row
        #[arg(long, value_name = "FILE")]
        csv: PathBuf,

        /// Target table (case-insensitive)
        #[arg(long)]
        table: String,

        /// Columns to fill, matched to CSV headers by name
        #[arg(long, required = true, num_args = 1..)]
        fields: Vec<String>,
    },

    /// Drop and recreate all application tables
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the menu
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::resolve(ConfigOverrides {
        config_file: cli.config,
        database_path: cli.database,
        ..Default::default()
    });
    info!("Database path: {}", cfg.database_path.display());

    let pool = empdir_common::db::open_database(&cfg.database_path).await?;

    let outcome = match cli.command {
        None => {
            let result = Menu::new(Term::stdout(), &pool).run().await;
            pool.close().await;
            result?;
            return Ok(());
        }
        Some(Command::Create) => ops::create_database(&pool).await,
        Some(Command::Drop) => ops::drop_database(&pool).await,
        Some(Command::Reset) => ops::reset_database(&pool).await,
        Some(Command::Populate { csv, table, fields }) => {
            let request = PopulateRequest {
                csv_path: csv,
                table,
                fields: empdir_admin::populate::parse_fields(&fields.join(" ")),
            };
            ops::populate_database(&pool, &request).await
        }
    };

    pool.close().await;
    print_outcome(&outcome);

    if outcome.is_failure() {
        bail!("{} failed", outcome.title);
    }
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    println!("{}", outcome.title);
    for line in &outcome.lines {
        println!("  {}", line);
    }
}
