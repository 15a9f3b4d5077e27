//! Suggest command - read a board from a file and print the engine's move
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), load_board(), suggest_move(), report()
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use hexai_core::{BoardState, Move, Player};
use hexai_player::{AiConfig, AiType, ComputerPlayer, Strategy};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SuggestArgs {
    /// Board text file ('R', 'B', '.' separated by whitespace, one row per line)
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Color to move for: red or blue
    #[arg(long)]
    pub player: Player,

    /// Engine override: combo, graph or rollout
    #[arg(long)]
    pub ai: Option<AiType>,

    /// Seconds for the rollout engine
    #[arg(long)]
    pub time: Option<f64>,

    /// AI config JSON file; command-line options take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

/// A move with how it was found
#[derive(Clone, Debug)]
struct Suggestion {
    player: Player,
    strategy: Strategy,
    mv: Move,
    elapsed: Duration,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run suggest command
pub fn run(args: SuggestArgs) -> Result<()> {
    let config = load_config(&args)?;
    let board = load_board(&args)?;

    tracing::info!(
        "Suggesting move for {} on {}x{} board ({} engine)",
        args.player,
        board.width(),
        board.height(),
        config.ai_type
    );

    let suggestion = suggest_move(&board, args.player, config)?;

    report(&board, &suggestion, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file (or defaults), then command-line overrides
fn load_config(args: &SuggestArgs) -> Result<AiConfig> {
    let mut config = match &args.config {
        Some(path) => AiConfig::load(path)?,
        None => AiConfig::default(),
    };
    if let Some(ai_type) = args.ai {
        config.ai_type = ai_type;
    }
    if let Some(secs) = args.time {
        config = config.with_time_budget(secs);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn load_board(args: &SuggestArgs) -> Result<BoardState> {
    let text = std::fs::read_to_string(&args.board)
        .with_context(|| format!("Failed to read board: {}", args.board.display()))?;
    let board: BoardState = text
        .parse()
        .with_context(|| format!("Failed to parse board: {}", args.board.display()))?;

    if let Some(winner) = board.winner() {
        anyhow::bail!("Game is already over: {winner} has connected");
    }
    Ok(board)
}

fn suggest_move(board: &BoardState, player: Player, config: AiConfig) -> Result<Suggestion> {
    let mut ai = ComputerPlayer::new(player, config);
    let started = Instant::now();

    let strategy = ai
        .select_strategy(board)
        .context("Failed to select strategy")?;
    let mv = ai.decide(board).context("Failed to choose move")?;

    Ok(Suggestion {
        player,
        strategy,
        mv,
        elapsed: started.elapsed(),
    })
}

fn report(board: &BoardState, suggestion: &Suggestion, json: bool) {
    if json {
        print_json(suggestion);
    } else {
        print_text(board, suggestion);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn strategy_name(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Middle => "middle",
        Strategy::Mirror(_) => "mirror",
        Strategy::Concede => "concede",
        Strategy::Graph => "graph",
        Strategy::Rollout => "rollout",
    }
}

fn print_json(suggestion: &Suggestion) {
    #[derive(serde::Serialize)]
    struct JsonOutput {
        player: Player,
        strategy: &'static str,
        concede: bool,
        x: Option<i32>,
        y: Option<i32>,
        elapsed_ms: u64,
    }

    let position = suggestion.mv.position();
    let output = JsonOutput {
        player: suggestion.player,
        strategy: strategy_name(suggestion.strategy),
        concede: suggestion.mv.is_concession(),
        x: position.map(|c| c.x),
        y: position.map(|c| c.y),
        elapsed_ms: suggestion.elapsed.as_millis() as u64,
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text(board: &BoardState, suggestion: &Suggestion) {
    println!("{}", board);
    println!(
        "{} plays {} ({}, {:.2}s)",
        suggestion.player,
        suggestion.mv,
        strategy_name(suggestion.strategy),
        suggestion.elapsed.as_secs_f64()
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(board: PathBuf) -> SuggestArgs {
        SuggestArgs {
            board,
            player: Player::Red,
            ai: None,
            time: None,
            config: None,
            seed: None,
            json: false,
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut args = args_for(PathBuf::from("unused"));
        args.ai = Some(AiType::Graph);
        args.time = Some(1.0);
        args.seed = Some(3);
        let config = load_config(&args).unwrap();
        assert_eq!(config.ai_type, AiType::Graph);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.time_budget_secs, 1.0);
    }

    #[test]
    fn test_missing_board_file() {
        let args = args_for(PathBuf::from("/nonexistent/board.txt"));
        let err = load_board(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read board"));
    }

    #[test]
    fn test_finished_board_rejected() {
        let path = std::env::temp_dir().join(format!("hexai-board-{}.txt", std::process::id()));
        std::fs::write(&path, "R B\nR .\n").unwrap();
        let result = load_board(&args_for(path.clone()));
        std::fs::remove_file(&path).unwrap();
        assert!(result.unwrap_err().to_string().contains("already over"));
    }

    #[test]
    fn test_suggest_opening() {
        let board = BoardState::new(5, 5).unwrap();
        let config = AiConfig::default().with_seed(1);
        let suggestion = suggest_move(&board, Player::Red, config).unwrap();
        assert_eq!(suggestion.strategy, Strategy::Middle);
        assert_eq!(suggestion.mv, Move::place(2, 2));
    }
}
