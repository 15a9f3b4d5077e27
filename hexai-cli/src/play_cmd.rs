//! Play command - self-play match between two computer players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_configs(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hexai_core::{Move, Player};
use hexai_player::{AiConfig, AiType, GameRunner};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board width (Blue connects left and right)
    #[arg(long, default_value = "7")]
    pub width: i32,

    /// Board height (Red connects top and bottom)
    #[arg(long, default_value = "7")]
    pub height: i32,

    /// Engine for Red: combo, graph or rollout
    #[arg(long, default_value = "combo")]
    pub red: AiType,

    /// Engine for Blue: combo, graph or rollout
    #[arg(long, default_value = "combo")]
    pub blue: AiType,

    /// Seconds per move for the rollout engine
    #[arg(long, default_value = "1.0")]
    pub time: f64,

    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Worker threads per engine (default: all cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Stop a game after this many moves
    #[arg(long)]
    pub max_moves: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Option<Player>,
    conceded: bool,
    moves: Vec<Move>,
    final_board: String,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    red_wins: usize,
    blue_wins: usize,
    unfinished: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build both player configurations
/// 2. Play the match
/// 3. Report results
pub fn run(args: PlayArgs) -> Result<()> {
    let (red, blue) = build_configs(&args);

    tracing::info!(
        "Starting match: {} vs {} on {}x{} ({} games, {:.2}s per move)",
        red.ai_type,
        blue.ai_type,
        args.width,
        args.height,
        args.games,
        red.time_budget_secs
    );

    let results = play_match(&red, &blue, &args)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Player configurations from the command line
fn build_configs(args: &PlayArgs) -> (AiConfig, AiConfig) {
    let build = |ai_type| {
        let config = AiConfig::new(ai_type).with_time_budget(args.time);
        match args.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    };
    (build(args.red), build(args.blue))
}

/// Play all games in the match
fn play_match(red: &AiConfig, blue: &AiConfig, args: &PlayArgs) -> Result<MatchResults> {
    let mut rng = create_rng(args.seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let record = play_single_game(red, blue, game_num + 1, args, &mut rng)?;

        tracing::info!(
            "Game {}: {} ({} moves{})",
            record.game_number,
            format_winner(record.winner),
            record.moves.len(),
            if record.conceded { ", conceded" } else { "" }
        );

        games.push(record);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &PlayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game with fresh seeds for both players
fn play_single_game(
    red: &AiConfig,
    blue: &AiConfig,
    game_number: usize,
    args: &PlayArgs,
    rng: &mut ChaCha8Rng,
) -> Result<GameRecord> {
    let red = red.clone().with_seed(rng.gen());
    let blue = blue.clone().with_seed(rng.gen());

    let mut runner = GameRunner::new(args.width, args.height, red, blue);
    if let Some(limit) = args.max_moves {
        runner = runner.with_move_limit(limit);
    }

    let outcome = runner
        .play_game()
        .with_context(|| format!("Game {game_number} failed"))?;

    Ok(GameRecord {
        game_number,
        winner: outcome.winner,
        conceded: outcome.conceded,
        moves: outcome.moves,
        final_board: outcome.board.to_string(),
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let red_wins = games
        .iter()
        .filter(|g| g.winner == Some(Player::Red))
        .count();
    let blue_wins = games
        .iter()
        .filter(|g| g.winner == Some(Player::Blue))
        .count();
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        red_wins,
        blue_wins,
        unfinished,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn format_winner(winner: Option<Player>) -> String {
    match winner {
        Some(player) => format!("{player} wins"),
        None => "unfinished".to_string(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<Player>,
        conceded: bool,
        moves: Vec<String>,
        final_board: String,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        red_wins: usize,
        blue_wins: usize,
        unfinished: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        unfinished: results.unfinished,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                conceded: g.conceded,
                moves: g.moves.iter().map(ToString::to_string).collect(),
                final_board: g.final_board.clone(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "Red wins:    {} ({:.1}%)",
        results.red_wins,
        percent(results.red_wins, total)
    );
    println!(
        "Blue wins:   {} ({:.1}%)",
        results.blue_wins,
        percent(results.blue_wins, total)
    );
    if results.unfinished > 0 {
        println!("Unfinished:  {}", results.unfinished);
    }
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} moves{}",
            game.game_number,
            format_winner(game.winner),
            game.moves.len(),
            if game.conceded { " (conceded)" } else { "" }
        );
    }

    if let Some(last) = results.games.last() {
        println!("\nFinal board of game {}:\n{}", last.game_number, last.final_board);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_number: usize, winner: Option<Player>, moves: usize) -> GameRecord {
        GameRecord {
            game_number,
            winner,
            conceded: false,
            moves: vec![Move::place(0, 0); moves],
            final_board: String::new(),
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.red_wins, 0);
        assert_eq!(results.blue_wins, 0);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, Some(Player::Red), 10),
            record(2, Some(Player::Blue), 20),
            record(3, None, 30),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.red_wins, 1);
        assert_eq!(results.blue_wins, 1);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_moves, 20.0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_build_configs_applies_arguments() {
        let args = PlayArgs {
            width: 5,
            height: 5,
            red: AiType::Graph,
            blue: AiType::Rollout,
            time: 2.0,
            games: 1,
            workers: Some(3),
            max_moves: None,
            seed: None,
            json: false,
        };
        let (red, blue) = build_configs(&args);
        assert_eq!(red.ai_type, AiType::Graph);
        assert_eq!(blue.ai_type, AiType::Rollout);
        assert_eq!(red.workers, Some(3));
        assert_eq!(blue.time_budget_secs, 2.0);
    }

    #[test]
    fn test_play_match_small_board() {
        let args = PlayArgs {
            width: 3,
            height: 3,
            red: AiType::Combo,
            blue: AiType::Graph,
            time: 0.02,
            games: 2,
            workers: Some(2),
            max_moves: None,
            seed: Some(9),
            json: false,
        };
        let (red, blue) = build_configs(&args);
        let results = play_match(&red, &blue, &args).unwrap();
        assert_eq!(results.games.len(), 2);
        assert_eq!(results.red_wins + results.blue_wins, 2);
    }
}
