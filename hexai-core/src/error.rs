//! Error type shared by the board, graph and search code

use crate::board::Coordinate;
use crate::game::Player;

/// Errors raised by board construction, placement, graph mutation and search.
///
/// All of these are local programming-error conditions; callers treat them as
/// fatal to the current decision.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HexError {
    #[error("Invalid board size {width}x{height}: both dimensions must be positive")]
    InvalidBoardSize { width: i32, height: i32 },

    #[error("Invalid colour: {0:?}")]
    InvalidColor(String),

    #[error("Position {0} is outside the board")]
    PositionOutOfRange(Coordinate),

    #[error("Position {0} is already taken")]
    PositionOccupied(Coordinate),

    #[error("It is not {0}'s turn")]
    NotYourTurn(Player),

    #[error("The game is already won")]
    GameOver,

    #[error("No graph node at {0}")]
    PositionNotFound(Coordinate),

    #[error("Board cells cannot be turned into start/end nodes ({0})")]
    InvalidNodeType(Coordinate),

    #[error("Node weight not set{}", .0.map(|c| format!(" at {c}")).unwrap_or_default())]
    NodeWeightUnset(Option<Coordinate>),

    #[error("No valid moves: every cell is occupied")]
    NoValidMoves,

    #[error("Failed to parse board: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HexError>;
