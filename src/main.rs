use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skillchain::cli;

#[derive(Parser)]
#[command(name = "skillchain", version)]
#[command(about = "Validate skill packages and compute a safe installation order", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a skills directory and print the installation order
    Order {
        /// Directory containing skill subdirectories
        skills_dir: String,

        /// Only print the installation order, without the dependency tree
        #[arg(long)]
        order_only: bool,
    },

    /// Check that every declared prerequisite resolves to a known skill
    Check {
        /// Directory containing skill subdirectories
        skills_dir: String,
    },

    /// Validate a single skill folder's structure and content
    Validate {
        /// Path to the skill directory
        skill_path: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors and warnings
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Order {
            skills_dir,
            order_only,
        } => cli::order::run(&skills_dir, order_only)?,
        Commands::Check { skills_dir } => cli::check::run(&skills_dir)?,
        Commands::Validate {
            skill_path,
            strict,
            quiet,
        } => cli::validate::run(&skill_path, strict, quiet)?,
    }

    Ok(())
}
