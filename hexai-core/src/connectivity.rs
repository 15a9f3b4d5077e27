//! Win detection
//!
//! Best-first walk over one color's stones from its starting edge. Cells that
//! are further along the connecting axis are explored first, so a chain that
//! heads straight for the far edge is confirmed quickly.

use crate::board::Coordinate;
use crate::game::{BoardState, Player};

/// Check whether `player` has a chain of stones joining its two edges.
///
/// Red connects row 0 to the last row, Blue connects column 0 to the last
/// column. Always false on an empty board.
pub fn has_connection(board: &BoardState, player: Player) -> bool {
    let (width, height) = (board.width(), board.height());
    let target = match player {
        Player::Red => height - 1,
        Player::Blue => width - 1,
    };
    let progress = |c: Coordinate| match player {
        Player::Red => c.y,
        Player::Blue => c.x,
    };

    let mut visited = vec![false; (width * height) as usize];
    let slot = |c: Coordinate| (c.y * width + c.x) as usize;

    let seeds: Vec<Coordinate> = match player {
        Player::Red => (0..width).map(|x| Coordinate::new(x, 0)).collect(),
        Player::Blue => (0..height).map(|y| Coordinate::new(0, y)).collect(),
    };
    let mut frontier: Vec<Coordinate> = Vec::new();
    for seed in seeds {
        if board.stone(seed) == Some(player) {
            visited[slot(seed)] = true;
            frontier.push(seed);
        }
    }

    while !frontier.is_empty() {
        let current = frontier.remove(0);
        if progress(current) == target {
            return true;
        }

        for next in current.neighbors(width, height) {
            if visited[slot(next)] || board.stone(next) != Some(player) {
                continue;
            }
            visited[slot(next)] = true;
            let at = frontier
                .iter()
                .position(|&queued| progress(queued) < progress(next))
                .unwrap_or(frontier.len());
            frontier.insert(at, next);
        }
    }

    false
}

// ============================================================================
// TESTS
// ============================================================================
