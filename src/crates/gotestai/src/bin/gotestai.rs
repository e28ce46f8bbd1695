//! gotestai CLI entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gotestai")]
#[command(about = "Generate Go test files using generative AI", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate tests for a given project
    Generate {
        /// Root path of the Go project
        path: PathBuf,

        /// Comma-separated paths to exclude from discovery
        #[arg(long, value_name = "PATHS")]
        exclude: Option<String>,

        /// Model provider to use (google, openai)
        #[arg(long, value_name = "PROVIDER")]
        provider: Option<String>,

        /// Maximum simultaneous provider calls
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Store an API key for a provider
    Set {
        /// Provider the key belongs to (google, openai)
        #[arg(long)]
        provider: String,

        /// API key value
        #[arg(long = "api-key")]
        api_key: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            path,
            exclude,
            provider,
            concurrency,
        } => gotestai::cli::generate(path, exclude, provider, concurrency).await,
        Commands::Config(ConfigCommands::Set { provider, api_key }) => {
            gotestai::cli::config_set(provider, api_key).await
        }
    };

    if let Err(err) = result {
        eprintln!("{}", format!("Error: {}", err).red());
        std::process::exit(1);
    }
}
