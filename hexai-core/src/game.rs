//! Players, moves and board state

use crate::board::Coordinate;
use crate::connectivity::has_connection;
use crate::error::{HexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color. Red moves first and connects top to bottom, Blue connects
/// left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Red = 0,
    Blue = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    fn symbol(self) -> char {
        match self {
            Player::Red => 'R',
            Player::Blue => 'B',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => write!(f, "Red"),
            Player::Blue => write!(f, "Blue"),
        }
    }
}

impl FromStr for Player {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Player::Red),
            "blue" | "b" => Ok(Player::Blue),
            _ => Err(HexError::InvalidColor(s.to_string())),
        }
    }
}

/// A decision: place a stone or give up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Place(Coordinate),
    Concede,
}

impl Move {
    pub fn place(x: i32, y: i32) -> Self {
        Move::Place(Coordinate::new(x, y))
    }

    pub fn is_concession(&self) -> bool {
        matches!(self, Move::Concede)
    }

    /// Target cell, `None` for a concession
    pub fn position(&self) -> Option<Coordinate> {
        match self {
            Move::Place(c) => Some(*c),
            Move::Concede => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place(c) => write!(f, "{c}"),
            Move::Concede => write!(f, "Concede"),
        }
    }
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Board state (clone to branch)
///
/// Cells only ever go from empty to occupied, the winner is cached once
/// found, and the turn flips after every successful placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    width: i32,
    height: i32,
    /// Row-major cells
    cells: Vec<Option<Player>>,
    current_player: Player,
    winner: Option<Player>,
}

impl BoardState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create an empty board
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(HexError::InvalidBoardSize { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
            current_player: Player::Red,
            winner: None,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Player to move
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Cached winner, if the game is over
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.is_valid(self.width, self.height)
    }

    /// Stone at `coord`; `None` for empty or off-board cells
    pub fn stone(&self, coord: Coordinate) -> Option<Player> {
        self.index(coord).and_then(|i| self.cells[i])
    }

    /// True for an on-board cell with no stone
    pub fn is_empty_cell(&self, coord: Coordinate) -> bool {
        matches!(self.index(coord), Some(i) if self.cells[i].is_none())
    }

    /// Empty cells, x outer and y inner
    pub fn empty_cells(&self) -> Vec<Coordinate> {
        let mut free = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let coord = Coordinate::new(x, y);
                if self.is_empty_cell(coord) {
                    free.push(coord);
                }
            }
        }
        free
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// No stone has been placed yet
    pub fn is_fresh(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Geometric center, rounded down
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.width / 2, self.height / 2)
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        if self.contains(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Play `mv` for `player`, enforcing turn order
    pub fn place(&mut self, player: Player, mv: Move) -> Result<()> {
        if self.winner.is_some() {
            return Err(HexError::GameOver);
        }
        if player != self.current_player {
            return Err(HexError::NotYourTurn(player));
        }

        match mv {
            Move::Concede => {
                self.winner = Some(player.opponent());
            }
            Move::Place(coord) => {
                self.set_stone(coord, player)?;
                if has_connection(self, player) {
                    self.winner = Some(player);
                }
                self.current_player = player.opponent();
            }
        }
        Ok(())
    }

    /// Apply move, return new state
    pub fn apply(&self, player: Player, mv: Move) -> Result<Self> {
        let mut next = self.clone();
        next.place(player, mv)?;
        Ok(next)
    }

    /// Put a stone on an empty cell without touching turn or winner.
    ///
    /// Used for hypothetical boards during search.
    pub fn set_stone(&mut self, coord: Coordinate, player: Player) -> Result<()> {
        let i = self
            .index(coord)
            .ok_or(HexError::PositionOutOfRange(coord))?;
        if self.cells[i].is_some() {
            return Err(HexError::PositionOccupied(coord));
        }
        self.cells[i] = Some(player);
        Ok(())
    }
}

// ============================================================================
// TEXT FORMAT
// ============================================================================

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            // Shift each row to show the rhombus
            write!(f, "{}", " ".repeat(y as usize))?;
            for x in 0..self.width {
                let symbol = self
                    .stone(Coordinate::new(x, y))
                    .map(Player::symbol)
                    .unwrap_or('.');
                if x > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for BoardState {
    type Err = HexError;

    /// Parse rows of `.`, `R` and `B`; the player to move is inferred from
    /// the stone counts.
    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let height = rows.len() as i32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as i32;
        let mut board = BoardState::new(width, height)
            .map_err(|e| HexError::Parse(e.to_string()))?;

        let (mut red, mut blue) = (0usize, 0usize);
        for (y, row) in rows.iter().enumerate() {
            if row.len() as i32 != width {
                return Err(HexError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            for (x, &symbol) in row.iter().enumerate() {
                let player = match symbol.to_ascii_uppercase() {
                    '.' => continue,
                    'R' => Player::Red,
                    'B' => Player::Blue,
                    other => return Err(HexError::InvalidColor(other.to_string())),
                };
                match player {
                    Player::Red => red += 1,
                    Player::Blue => blue += 1,
                }
                board.set_stone(Coordinate::new(x as i32, y as i32), player)?;
            }
        }

        board.current_player = if red == blue {
            Player::Red
        } else if red == blue + 1 {
            Player::Blue
        } else {
            return Err(HexError::Parse(format!(
                "stone counts Red={red} Blue={blue} cannot arise from alternating play"
            )));
        };

        board.winner = [Player::Red, Player::Blue]
            .into_iter()
            .find(|&p| has_connection(&board, p));

        Ok(board)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = BoardState::new(3, 4).unwrap();
        assert_eq!(board.current_player(), Player::Red);
        assert_eq!(board.winner(), None);
        assert_eq!(board.cell_count(), 12);
        assert!(board.is_fresh());
        assert_eq!(board.center(), Coordinate::new(1, 2));
    }

    #[test]
    fn test_invalid_board_size() {
        assert_eq!(
            BoardState::new(0, 5),
            Err(HexError::InvalidBoardSize { width: 0, height: 5 })
        );
        assert!(BoardState::new(4, -1).is_err());
    }

    #[test]
    fn test_turn_alternates() {
        let mut board = BoardState::new(3, 3).unwrap();
        board.place(Player::Red, Move::place(0, 0)).unwrap();
        assert_eq!(board.current_player(), Player::Blue);
        assert_eq!(
            board.place(Player::Red, Move::place(1, 1)),
            Err(HexError::NotYourTurn(Player::Red))
        );
        board.place(Player::Blue, Move::place(1, 1)).unwrap();
        assert_eq!(board.current_player(), Player::Red);
    }

    #[test]
    fn test_placement_errors() {
        let mut board = BoardState::new(3, 3).unwrap();
        assert_eq!(
            board.place(Player::Red, Move::place(3, 0)),
            Err(HexError::PositionOutOfRange(Coordinate::new(3, 0)))
        );
        board.place(Player::Red, Move::place(0, 0)).unwrap();
        assert_eq!(
            board.place(Player::Blue, Move::place(0, 0)),
            Err(HexError::PositionOccupied(Coordinate::new(0, 0)))
        );
        // Failed placements keep the turn
        assert_eq!(board.current_player(), Player::Blue);
    }

    #[test]
    fn test_winner_cached_and_final() {
        let mut board = BoardState::new(2, 2).unwrap();
        board.place(Player::Red, Move::place(0, 0)).unwrap();
        board.place(Player::Blue, Move::place(1, 0)).unwrap();
        board.place(Player::Red, Move::place(0, 1)).unwrap();
        assert_eq!(board.winner(), Some(Player::Red));
        assert_eq!(
            board.place(Player::Blue, Move::place(1, 1)),
            Err(HexError::GameOver)
        );
    }

    #[test]
    fn test_concession() {
        let board = BoardState::new(5, 5).unwrap();
        let next = board.apply(Player::Red, Move::Concede).unwrap();
        assert_eq!(next.winner(), Some(Player::Blue));
        // Source board untouched
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_empty_cells_order() {
        let mut board = BoardState::new(2, 2).unwrap();
        board.set_stone(Coordinate::new(0, 1), Player::Blue).unwrap();
        assert_eq!(
            board.empty_cells(),
            vec![Coordinate::new(0, 0), Coordinate::new(1, 0), Coordinate::new(1, 1)]
        );
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_text_round_trip() {
        let text = "R . .\n . B .\n  . . R\n";
        let board: BoardState = text.parse().unwrap();
        assert_eq!(board.stone(Coordinate::new(0, 0)), Some(Player::Red));
        assert_eq!(board.stone(Coordinate::new(1, 1)), Some(Player::Blue));
        assert_eq!(board.stone(Coordinate::new(2, 2)), Some(Player::Red));
        assert_eq!(board.current_player(), Player::Blue);
        assert_eq!(board.to_string(), text);

        let reparsed: BoardState = board.to_string().parse().unwrap();
        assert_eq!(reparsed, board);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!("R X\n. .".parse::<BoardState>(), Err(HexError::InvalidColor(_))));
        assert!(matches!("R R\n. .".parse::<BoardState>(), Err(HexError::Parse(_))));
        assert!(matches!("R .\n.".parse::<BoardState>(), Err(HexError::Parse(_))));
        assert!(matches!("".parse::<BoardState>(), Err(HexError::Parse(_))));
    }

    #[test]
    fn test_player_parse() {
        assert_eq!("red".parse::<Player>(), Ok(Player::Red));
        assert_eq!("B".parse::<Player>(), Ok(Player::Blue));
        assert!(matches!("green".parse::<Player>(), Err(HexError::InvalidColor(_))));
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::place(1, 2).to_string(), "(1,2)");
        assert_eq!(Move::Concede.to_string(), "Concede");
        assert!(Move::Concede.is_concession());
        assert_eq!(Move::place(1, 2).position(), Some(Coordinate::new(1, 2)));
    }

    #[test]
    fn test_serde_forms() {
        assert_eq!(serde_json::to_string(&Player::Blue).unwrap(), "\"blue\"");
        let mv: Move = serde_json::from_str(r#"{"Place":{"x":1,"y":2}}"#).unwrap();
        assert_eq!(mv, Move::place(1, 2));
        assert_eq!(serde_json::to_string(&Move::Concede).unwrap(), "\"Concede\"");
    }
}
