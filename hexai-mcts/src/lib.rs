//! HEXAI MCTS - Monte Carlo rollout search
//!
//! This crate provides the flat Monte Carlo player:
//! - Random playouts from each empty cell
//! - Timed parallel workers on rayon, stopped by deadline or cancel token
//! - Per-cell win-rate tables, summed across workers

pub mod rollout;
pub mod search;

use hexai_core::{BoardState, Move, Player, Result};
use std::time::Duration;
use tracing::debug;

pub use rollout::random_playout;
pub use search::{run_search, CancelToken, PlayoutTable, SearchResult};

/// Rollout search configuration
#[derive(Clone, Debug, PartialEq)]
pub struct RolloutConfig {
    /// Wall-clock budget; every worker still completes one sweep
    pub time_budget: Duration,
    pub workers: usize,
    /// Base seed, worker `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(90),
            workers: rayon::current_num_threads(),
            seed: None,
        }
    }
}

impl RolloutConfig {
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Player that picks the cell with the best playout win rate
pub struct RolloutPlayer {
    config: RolloutConfig,
    cancel: CancelToken,
}

impl RolloutPlayer {
    pub fn new(config: RolloutConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }

    /// Handle that stops the running search after the current sweep.
    ///
    /// Each search starts with the flag cleared, so a cancel only ends the
    /// search in progress.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the search and return the raw counters
    pub fn search(&self, board: &BoardState, player: Player) -> Result<SearchResult> {
        self.cancel.reset();
        run_search(board, player, &self.config, &self.cancel)
    }

    /// Best cell by win rate, or `Move::Concede` if no playout was won
    pub fn best_move(&self, board: &BoardState, player: Player) -> Result<Move> {
        let result = self.search(board, player)?;
        let mv = result.best_cell().map_or(Move::Concede, Move::Place);
        debug!(player = %player, chosen = %mv, playouts = result.total_playouts(), "rollout move");
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexai_core::{Coordinate, HexError};

    fn fast_player(seed: u64) -> RolloutPlayer {
        RolloutPlayer::new(
            RolloutConfig::default()
                .with_time_budget(Duration::from_millis(100))
                .with_workers(2)
                .with_seed(seed),
        )
    }

    #[test]
    fn test_config_builders() {
        let config = RolloutConfig::default()
            .with_time_budget(Duration::from_secs(3))
            .with_workers(0)
            .with_seed(9);
        assert_eq!(config.time_budget, Duration::from_secs(3));
        assert_eq!(config.workers, 1);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_takes_immediate_win() {
        // Red wins at once on (1,2) or (0,2); anything else can still lose
        let board: BoardState = "B R B\n . R .\n  . . .".parse().unwrap();
        let mv = fast_player(42).best_move(&board, Player::Red).unwrap();
        assert!(
            mv == Move::place(1, 2) || mv == Move::place(0, 2),
            "unexpected move {mv}"
        );
    }

    #[test]
    fn test_single_cell_board() {
        let board = BoardState::new(1, 1).unwrap();
        let mv = fast_player(1).best_move(&board, Player::Red).unwrap();
        assert_eq!(mv, Move::Place(Coordinate::new(0, 0)));
    }

    #[test]
    fn test_lost_position_concedes() {
        // Blue's only cell leaves Red connected down the middle column
        let board: BoardState = "B R B\n R R B\n  . R B".parse().unwrap();
        let mv = fast_player(3).best_move(&board, Player::Blue).unwrap();
        assert_eq!(mv, Move::Concede);
    }

    #[test]
    fn test_cancel_does_not_outlive_search() {
        let board = BoardState::new(4, 4).unwrap();
        let player = RolloutPlayer::new(
            RolloutConfig::default()
                .with_time_budget(Duration::from_millis(200))
                .with_workers(2)
                .with_seed(7),
        );
        player.cancel_token().cancel();

        let result = player.search(&board, Player::Red).unwrap();
        assert!(result.elapsed >= Duration::from_millis(200));
        assert!(result.total_playouts() > 2 * 16);
        assert!(!player.cancel_token().is_cancelled());
    }

    #[test]
    fn test_full_board_errors() {
        let board: BoardState = "R B\nB R".parse().unwrap();
        assert_eq!(
            fast_player(1).best_move(&board, Player::Red),
            Err(HexError::NoValidMoves)
        );
    }
}
