//! Game runner - plays computer players against each other
//!
//! Level 3 - Step-level implementation

use hexai_core::{BoardState, Move, Player};
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::selector::ComputerPlayer;

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// `None` only when the move limit stopped the game
    pub winner: Option<Player>,
    /// Move history, Red first
    pub moves: Vec<Move>,
    /// The game ended by concession rather than a connection
    pub conceded: bool,
    pub board: BoardState,
}

impl GameOutcome {
    pub fn red_wins(&self) -> bool {
        self.winner == Some(Player::Red)
    }

    pub fn blue_wins(&self) -> bool {
        self.winner == Some(Player::Blue)
    }

    /// Stones placed (a concession is not a stone)
    pub fn stones_placed(&self) -> usize {
        self.moves.iter().filter(|m| !m.is_concession()).count()
    }
}

/// Game runner that plays games between two AI configurations
#[derive(Clone, Debug)]
pub struct GameRunner {
    width: i32,
    height: i32,
    red: AiConfig,
    blue: AiConfig,
    max_moves: Option<usize>,
}

impl GameRunner {
    /// Create a new game runner
    pub fn new(width: i32, height: i32, red: AiConfig, blue: AiConfig) -> Self {
        Self {
            width,
            height,
            red,
            blue,
            max_moves: None,
        }
    }

    /// Stop games after `max_moves` moves even without a winner
    pub fn with_move_limit(mut self, max_moves: usize) -> Self {
        self.max_moves = Some(max_moves);
        self
    }

    /// Play one game from an empty board with fresh players
    pub fn play_game(&self) -> hexai_core::Result<GameOutcome> {
        let mut board = BoardState::new(self.width, self.height)?;
        let mut red = ComputerPlayer::new(Player::Red, self.red.clone());
        let mut blue = ComputerPlayer::new(Player::Blue, self.blue.clone());
        let mut moves = Vec::new();
        let mut conceded = false;

        while board.winner().is_none() {
            if self.max_moves.is_some_and(|limit| moves.len() >= limit) {
                break;
            }

            let player = board.current_player();
            let mv = match player {
                Player::Red => red.decide(&board)?,
                Player::Blue => blue.decide(&board)?,
            };
            debug!(player = %player, mv = %mv, "move");

            board.place(player, mv)?;
            conceded = mv.is_concession();
            moves.push(mv);
        }

        info!(
            "Game over: winner={} moves={}{}",
            board
                .winner()
                .map_or_else(|| "none".to_string(), |p| p.to_string()),
            moves.len(),
            if conceded { " (conceded)" } else { "" }
        );

        Ok(GameOutcome {
            winner: board.winner(),
            moves,
            conceded,
            board,
        })
    }

    pub fn red_config(&self) -> &AiConfig {
        &self.red
    }

    pub fn blue_config(&self) -> &AiConfig {
        &self.blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiType;
    use hexai_core::has_connection;

    fn quick(ai_type: AiType, seed: u64) -> AiConfig {
        AiConfig::new(ai_type)
            .with_time_budget(0.02)
            .with_workers(2)
            .with_seed(seed)
    }

    #[test]
    fn test_combo_game_finishes_with_winner() {
        let runner = GameRunner::new(3, 3, quick(AiType::Combo, 1), quick(AiType::Combo, 2));
        let outcome = runner.play_game().unwrap();
        let winner = outcome.winner.expect("game must finish");
        assert!(outcome.moves.len() <= 10);
        assert_eq!(outcome.moves[0], Move::place(1, 1));
        if !outcome.conceded {
            assert!(has_connection(&outcome.board, winner));
        }
    }

    #[test]
    fn test_mixed_engines_finish() {
        let runner = GameRunner::new(4, 4, quick(AiType::Rollout, 3), quick(AiType::Graph, 4));
        let outcome = runner.play_game().unwrap();
        assert!(outcome.red_wins() || outcome.blue_wins());
        assert!(outcome.stones_placed() <= 16);
    }

    #[test]
    fn test_mirror_board_finishes() {
        let runner = GameRunner::new(3, 4, quick(AiType::Combo, 5), quick(AiType::Combo, 6));
        let outcome = runner.play_game().unwrap();
        assert!(outcome.winner.is_some());
    }

    #[test]
    fn test_move_limit() {
        let runner = GameRunner::new(5, 5, quick(AiType::Graph, 7), quick(AiType::Graph, 8))
            .with_move_limit(2);
        let outcome = runner.play_game().unwrap();
        assert_eq!(outcome.moves.len(), 2);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.board.occupied_count(), 2);
    }
}
