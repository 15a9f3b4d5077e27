//! HEXAI CLI - Command-line interface
//!
//! Commands:
//! - play: Self-play match between two computer players
//! - suggest: Ask a computer player for a move on a saved board

mod play_cmd;
mod suggest;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexai")]
#[command(about = "Hex playing engine: graph search and timed rollouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play computer players against each other
    Play(play_cmd::PlayArgs),
    /// Suggest a move for a board read from a file
    Suggest(suggest::SuggestArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Suggest(args) => suggest::run(args),
    }
}
