//! Ledgerboard CLI - Database migrations and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Run dashboard database migrations (includes the session table)
//! lb-cli migrate
//!
//! # Seed users, customers, and invoices from a YAML fixture
//! lb-cli seed --file fixtures/demo.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database from a YAML file

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lb-cli")]
#[command(author, version, about = "Ledgerboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed {
        /// Path to the YAML seed file
        #[arg(short, long)]
        file: String,

        /// Connection string, overriding `DASHBOARD_DATABASE_URL`
        #[arg(long)]
        database_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, database_url } => {
            commands::seed::run(&file, database_url).await?;
        }
    }
    Ok(())
}
