//! Strategy selection for the computer player
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: `ComputerPlayer::decide` - pick a strategy, run it, remember the board
//! - Level 2: `select_strategy` - opening, mirroring, concession, engine choice
//! - Level 3: Mirror reply computation
//! - Level 4: Board comparison

use hexai_core::{
    BoardState, Coordinate, GraphModel, GraphSearch, HexError, Move, Player,
    GRAPH_SEARCH_CELL_LIMIT, UNSET_WEIGHT,
};
use hexai_mcts::RolloutPlayer;
use tracing::debug;

use crate::config::{AiConfig, AiType};

/// How a move will be chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// First stone of the game goes in the middle
    Middle,
    /// Answer the opponent's last stone across the short diagonal
    Mirror(Coordinate),
    /// The opponent is already through
    Concede,
    Graph,
    Rollout,
}

// ============================================================================
// COMPUTER PLAYER
// ============================================================================

/// A computer player for one color
pub struct ComputerPlayer {
    color: Player,
    config: AiConfig,
    /// Board as it stood after our last mirrored move
    previous: Option<BoardState>,
    graph: GraphSearch,
    rollout: RolloutPlayer,
}

impl ComputerPlayer {
    pub fn new(color: Player, config: AiConfig) -> Self {
        Self {
            color,
            graph: config.graph_search(),
            rollout: RolloutPlayer::new(config.rollout_config()),
            config,
            previous: None,
        }
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    // ========================================================================
    // LEVEL 1 - DECISION
    // ========================================================================

    /// Choose a move for the current board; `board` is never modified
    pub fn decide(&mut self, board: &BoardState) -> hexai_core::Result<Move> {
        let strategy = self.select_strategy(board)?;
        debug!(player = %self.color, ?strategy, "strategy selected");

        let mv = match strategy {
            Strategy::Middle => Move::Place(board.center()),
            Strategy::Mirror(cell) => Move::Place(cell),
            Strategy::Concede => Move::Concede,
            Strategy::Graph => self.graph.best_move(board, self.color)?,
            Strategy::Rollout => self.rollout.best_move(board, self.color)?,
        };

        if self.mirrors(board) {
            let mut snapshot = board.clone();
            if let Move::Place(cell) = mv {
                snapshot.set_stone(cell, self.color)?;
            }
            self.previous = Some(snapshot);
        }

        Ok(mv)
    }

    // ========================================================================
    // LEVEL 2 - STRATEGY
    // ========================================================================

    /// Decide how to move without running any search
    pub fn select_strategy(&self, board: &BoardState) -> hexai_core::Result<Strategy> {
        if board.empty_cells().is_empty() {
            return Err(HexError::NoValidMoves);
        }

        match self.config.ai_type {
            AiType::Graph => return Ok(Strategy::Graph),
            AiType::Rollout => return Ok(Strategy::Rollout),
            AiType::Combo => {}
        }

        if board.is_fresh() {
            return Ok(Strategy::Middle);
        }

        if self.mirrors(board) {
            if let Some(cell) = self.mirror_reply(board) {
                return Ok(Strategy::Mirror(cell));
            }
        }

        let own = GraphModel::new(board, self.color)?.distance();
        let rival = GraphModel::new(board, self.color.opponent())?.distance();
        match (own, rival) {
            (None, _) | (_, None) => return Ok(Strategy::Rollout),
            (Some(own), _) if own < UNSET_WEIGHT => return Ok(Strategy::Rollout),
            (_, Some(rival)) if rival < UNSET_WEIGHT => return Ok(Strategy::Concede),
            _ => {}
        }

        if board.cell_count() > GRAPH_SEARCH_CELL_LIMIT {
            Ok(Strategy::Rollout)
        } else {
            Ok(Strategy::Graph)
        }
    }

    /// Blue on a board one row taller than wide can copy Red's moves
    fn mirrors(&self, board: &BoardState) -> bool {
        self.config.ai_type == AiType::Combo
            && self.color == Player::Blue
            && board.height() == board.width() + 1
    }

    // ========================================================================
    // LEVEL 3 - MIRRORING
    // ========================================================================

    /// Reflection of the opponent's newest stone, if it is playable
    fn mirror_reply(&self, board: &BoardState) -> Option<Coordinate> {
        let blank;
        let previous = match &self.previous {
            Some(prev) if prev.width() == board.width() && prev.height() == board.height() => prev,
            _ => {
                blank = BoardState::new(board.width(), board.height()).ok()?;
                &blank
            }
        };

        let changed = first_difference(previous, board, self.color.opponent())?;
        let cell = mirror_cell(changed, board.width(), board.height());
        board.is_empty_cell(cell).then_some(cell)
    }
}

/// Reflect `cell` across the anti-diagonal `x + y = max(w, h) - 1`, shifted so
/// that the two halves of a `w x (w + 1)` board map onto each other
pub fn mirror_cell(cell: Coordinate, width: i32, height: i32) -> Coordinate {
    let barrier = width.max(height) - 1;
    let d = cell.x + cell.y - barrier;
    let shift = if cell.x + cell.y < barrier {
        Coordinate::new(-d - 1, -d)
    } else {
        Coordinate::new(-d, -d - 1)
    };
    cell.add(shift)
}

// ============================================================================
// LEVEL 4 - BOARD COMPARISON
// ============================================================================

/// First cell (x outer, y inner) whose content differs and where either
/// board holds a `color` stone
fn first_difference(before: &BoardState, after: &BoardState, color: Player) -> Option<Coordinate> {
    for x in 0..after.width() {
        for y in 0..after.height() {
            let cell = Coordinate::new(x, y);
            let (old, new) = (before.stone(cell), after.stone(cell));
            if old != new && (old == Some(color) || new == Some(color)) {
                return Some(cell);
            }
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(ai_type: AiType) -> AiConfig {
        AiConfig::new(ai_type)
            .with_time_budget(0.05)
            .with_workers(2)
            .with_seed(42)
    }

    #[test]
    fn test_first_move_is_center() {
        for (w, h) in [(3, 3), (4, 5), (11, 11), (2, 7)] {
            let board = BoardState::new(w, h).unwrap();
            let mut player = ComputerPlayer::new(Player::Red, quick_config(AiType::Combo));
            assert_eq!(player.decide(&board).unwrap(), Move::Place(Coordinate::new(w / 2, h / 2)));
        }
    }

    #[test]
    fn test_mirror_worked_example() {
        assert_eq!(mirror_cell(Coordinate::new(0, 0), 3, 4), Coordinate::new(2, 3));

        let mut board = BoardState::new(3, 4).unwrap();
        board.place(Player::Red, Move::place(0, 0)).unwrap();
        let mut blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        assert_eq!(blue.select_strategy(&board).unwrap(), Strategy::Mirror(Coordinate::new(2, 3)));
        assert_eq!(blue.decide(&board).unwrap(), Move::place(2, 3));
    }

    #[test]
    fn test_mirror_tracks_previous_board() {
        let mut board = BoardState::new(3, 4).unwrap();
        let mut blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));

        board.place(Player::Red, Move::place(0, 0)).unwrap();
        let reply = blue.decide(&board).unwrap();
        board.place(Player::Blue, reply).unwrap();

        // (1,2) sits on the barrier and reflects to (1,1)
        board.place(Player::Red, Move::place(1, 2)).unwrap();
        assert_eq!(blue.decide(&board).unwrap(), Move::place(1, 1));
    }

    #[test]
    fn test_mirror_falls_through_when_occupied() {
        let mut board = BoardState::new(3, 4).unwrap();
        board.place(Player::Red, Move::place(2, 3)).unwrap();
        board.place(Player::Blue, Move::place(1, 1)).unwrap();
        board.place(Player::Red, Move::place(0, 0)).unwrap();
        // Red's (0,0) mirrors onto its own stone at (2,3); (2,3) comes later in scan order
        let blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        let strategy = blue.select_strategy(&board).unwrap();
        assert!(!matches!(strategy, Strategy::Mirror(_)));
        assert!(!matches!(strategy, Strategy::Middle));
    }

    #[test]
    fn test_red_never_mirrors() {
        let mut board = BoardState::new(3, 4).unwrap();
        board.set_stone(Coordinate::new(0, 0), Player::Blue).unwrap();
        let red = ComputerPlayer::new(Player::Red, quick_config(AiType::Combo));
        assert!(!matches!(red.select_strategy(&board).unwrap(), Strategy::Mirror(_)));
    }

    #[test]
    fn test_forced_types_skip_heuristics() {
        let board = BoardState::new(5, 5).unwrap();
        let graph = ComputerPlayer::new(Player::Red, quick_config(AiType::Graph));
        assert_eq!(graph.select_strategy(&board).unwrap(), Strategy::Graph);
        let rollout = ComputerPlayer::new(Player::Red, quick_config(AiType::Rollout));
        assert_eq!(rollout.select_strategy(&board).unwrap(), Strategy::Rollout);
    }

    #[test]
    fn test_small_board_uses_graph() {
        let mut board = BoardState::new(5, 5).unwrap();
        board.place(Player::Red, Move::place(2, 2)).unwrap();
        let blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        assert_eq!(blue.select_strategy(&board).unwrap(), Strategy::Graph);
    }

    #[test]
    fn test_large_board_uses_rollout() {
        let mut board = BoardState::new(15, 15).unwrap();
        board.place(Player::Red, Move::place(7, 7)).unwrap();
        let blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        assert_eq!(blue.select_strategy(&board).unwrap(), Strategy::Rollout);
    }

    #[test]
    fn test_concedes_when_opponent_is_through() {
        // Red's (1,0) and (0,2) form a bridge with both carriers empty
        let board: BoardState = ". R . B
                                 . . . .
                                 R . . B"
            .parse()
            .unwrap();
        let blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        assert_eq!(blue.select_strategy(&board).unwrap(), Strategy::Concede);
    }

    #[test]
    fn test_own_bridge_chain_uses_rollout() {
        // Red's (1,0) and (0,2) bridge across empty carriers: distance 0.01
        let board: BoardState = ". R . B
                                 . . . .
                                 R . . B"
            .parse()
            .unwrap();
        let red = ComputerPlayer::new(Player::Red, quick_config(AiType::Combo));
        let own = GraphModel::new(&board, Player::Red).unwrap().distance().unwrap();
        assert!(own < UNSET_WEIGHT);
        assert_eq!(red.select_strategy(&board).unwrap(), Strategy::Rollout);
    }

    #[test]
    fn test_unreachable_distance_uses_rollout() {
        // Red is through, so Blue cannot reach its far edge
        let board: BoardState = "R B .
                                 R B .
                                 R . ."
            .parse()
            .unwrap();
        assert_eq!(GraphModel::new(&board, Player::Blue).unwrap().distance(), None);

        // Unreachable wins over the opponent's short distance: no concession
        let blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        assert_eq!(blue.select_strategy(&board).unwrap(), Strategy::Rollout);

        let red = ComputerPlayer::new(Player::Red, quick_config(AiType::Combo));
        assert_eq!(red.select_strategy(&board).unwrap(), Strategy::Rollout);
    }

    #[test]
    fn test_full_board_reports_no_moves() {
        let board: BoardState = "R B\nB R".parse().unwrap();
        let mut player = ComputerPlayer::new(Player::Red, quick_config(AiType::Combo));
        assert_eq!(player.decide(&board), Err(HexError::NoValidMoves));
    }

    #[test]
    fn test_decide_does_not_touch_board() {
        let mut board = BoardState::new(4, 4).unwrap();
        board.place(Player::Red, Move::place(1, 1)).unwrap();
        let before = board.clone();
        let mut blue = ComputerPlayer::new(Player::Blue, quick_config(AiType::Combo));
        blue.decide(&board).unwrap();
        assert_eq!(board, before);
    }
}
