//! lakeddl CLI
//!
//! Prints the DDL the engine would run for a desired table or view
//! description, without executing anything. Descriptions are JSON files
//! deserializing into [`TableDescription`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use lakeddl::prelude::*;

/// Declarative table/view reconciliation into Spark-style DDL.
#[derive(Parser)]
#[command(name = "lakeddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the CREATE statement for a desired description.
    CreateSql {
        /// Path to the desired description (JSON).
        #[arg(short, long)]
        desired: PathBuf,
    },

    /// Print the ordered DDL statements that reconcile previous into desired.
    Plan {
        /// Path to the desired description (JSON).
        #[arg(short, long)]
        desired: PathBuf,

        /// Path to the previously recorded description (JSON).
        #[arg(short, long)]
        previous: PathBuf,
    },

    /// Print the DROP statement for a description.
    DropSql {
        /// Path to the description (JSON).
        #[arg(short, long)]
        desired: PathBuf,
    },
}

fn load_description(path: &Path) -> anyhow::Result<TableDescription> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading description from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing table description in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let managed = ManagedProperties::new();

    match cli.command {
        Commands::CreateSql { desired } => {
            let table = load_description(&desired)?;
            println!("{}", build_create_statement(&table, &managed));
        }

        Commands::Plan { desired, previous } => {
            let desired = load_description(&desired)?;
            let previous = load_description(&previous)?;

            let statements = diff(&desired, &previous, &managed)
                .with_context(|| format!("planning changes for {}", desired.full_name()))?;

            if statements.is_empty() {
                println!("-- no changes for {}", desired.full_name());
            } else {
                for statement in statements {
                    println!("{};", statement);
                }
            }
        }

        Commands::DropSql { desired } => {
            let table = load_description(&desired)?;
            println!("{}", build_drop_statement(&table));
        }
    }

    Ok(())
}
