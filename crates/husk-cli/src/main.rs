//! Husk CLI - inspect and exercise the husk bridge from the command line.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Husk - shell-script bridge tooling
#[derive(Parser)]
#[command(name = "husk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shared constant table
    Constants {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pull a file through the stream bridge one byte at a time
    Read {
        /// Input file
        file: PathBuf,
        /// Decode UTF-8 input to Latin-1 while reading
        #[arg(long)]
        latin1: bool,
        /// Echo the bytes read to stdout
        #[arg(long)]
        echo: bool,
    },

    /// Look up environment variables through the map bridge
    Env {
        /// Only print this variable
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Resolve a language dialect
    Dialect {
        /// Dialect name (bash, posix, sh, mksh, bats, auto)
        name: String,
        /// Script used to resolve `auto`
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show information about the bridge
    Info,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    husk_bridge::configure(&husk_bridge::BridgeConfig::from_env());

    match cli.command {
        Commands::Constants { json } => commands::constants::run(json),
        Commands::Read { file, latin1, echo } => commands::read::run(&file, latin1, echo),
        Commands::Env { key } => commands::env::run(key.as_deref()),
        Commands::Dialect { name, file } => commands::dialect::run(&name, file.as_deref()),
        Commands::Info => commands::info::run(),
    }
}
