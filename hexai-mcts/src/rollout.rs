//! Random playouts
//!
//! A playout puts our stone on one cell, then fills the rest of the board
//! with random alternating stones and asks who connected. Hex has no draws,
//! so a full board always has exactly one winner.
//!
//! ## Architecture
//! - Level 3: Single playout
//! - Level 4: Random fill

use hexai_core::{has_connection, BoardState, Coordinate, Player, Result};
use rand::prelude::*;

// ============================================================================
// SINGLE PLAYOUT (Level 3)
// ============================================================================

/// Play `player` at `cell`, fill the board at random, report whether `player`
/// ends up connected.
///
/// The opponent moves first after `cell`. `board` is never modified.
pub fn random_playout<R: Rng>(
    board: &BoardState,
    player: Player,
    cell: Coordinate,
    rng: &mut R,
) -> Result<bool> {
    let mut sim = board.clone();
    sim.set_stone(cell, player)?;
    fill_randomly(&mut sim, player.opponent(), rng)?;
    Ok(has_connection(&sim, player))
}

// ============================================================================
// RANDOM FILL (Level 4)
// ============================================================================

/// Fill every empty cell, alternating colors starting with `first`
fn fill_randomly<R: Rng>(board: &mut BoardState, first: Player, rng: &mut R) -> Result<()> {
    let mut free = board.empty_cells();
    let mut turn = first;
    while !free.is_empty() {
        let idx = rng.gen_range(0..free.len());
        let cell = free.swap_remove(idx);
        board.set_stone(cell, turn)?;
        turn = turn.opponent();
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
