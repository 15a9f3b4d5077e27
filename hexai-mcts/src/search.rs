//! Timed parallel rollout search
//!
//! Each worker repeatedly sweeps every empty cell, running one playout per
//! cell, and keeps its own counters. When the deadline passes (or the search
//! is cancelled) workers finish their current sweep and the counters are
//! summed.
//!
//! ## Architecture
//! - Level 2: Search coordination (`run_search`)
//! - Level 3: Worker sweep loop
//! - Level 4: Counter tables, cancellation

use crate::rollout::random_playout;
use crate::RolloutConfig;
use hexai_core::{BoardState, Coordinate, HexError, Player, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

// ============================================================================
// PLAYOUT TABLE (Level 4)
// ============================================================================

/// Per-cell play and win counters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayoutTable {
    width: i32,
    height: i32,
    plays: Vec<u64>,
    wins: Vec<u64>,
}

impl PlayoutTable {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            plays: vec![0; size],
            wins: vec![0; size],
        }
    }

    fn index(&self, cell: Coordinate) -> Option<usize> {
        if cell.is_valid(self.width, self.height) {
            Some((cell.y * self.width + cell.x) as usize)
        } else {
            None
        }
    }

    /// Count one playout started at `cell`
    pub fn record(&mut self, cell: Coordinate, won: bool) {
        if let Some(i) = self.index(cell) {
            self.plays[i] += 1;
            if won {
                self.wins[i] += 1;
            }
        }
    }

    pub fn plays(&self, cell: Coordinate) -> u64 {
        self.index(cell).map_or(0, |i| self.plays[i])
    }

    pub fn wins(&self, cell: Coordinate) -> u64 {
        self.index(cell).map_or(0, |i| self.wins[i])
    }

    pub fn total_plays(&self) -> u64 {
        self.plays.iter().sum()
    }

    /// Wins over plays, NaN for a cell never played
    pub fn win_rate(&self, cell: Coordinate) -> f64 {
        let plays = self.plays(cell);
        if plays == 0 {
            f64::NAN
        } else {
            self.wins(cell) as f64 / plays as f64
        }
    }

    /// Add another table's counters into this one
    pub fn merge(&mut self, other: &PlayoutTable) {
        for (mine, theirs) in self.plays.iter_mut().zip(&other.plays) {
            *mine += theirs;
        }
        for (mine, theirs) in self.wins.iter_mut().zip(&other.wins) {
            *mine += theirs;
        }
    }

    /// Cell with the highest win rate, scanning x outer and y inner.
    ///
    /// Earlier cells win ties; a cell needs a win rate above zero to count.
    pub fn best_cell(&self) -> Option<Coordinate> {
        let mut best = None;
        let mut best_rate = 0.0;
        for x in 0..self.width {
            for y in 0..self.height {
                let cell = Coordinate::new(x, y);
                let rate = self.win_rate(cell);
                if rate > best_rate {
                    best_rate = rate;
                    best = Some(cell);
                }
            }
        }
        best
    }
}

// ============================================================================
// CANCELLATION (Level 4)
// ============================================================================

/// Shared stop flag, checked by workers between sweeps
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clear the flag so the token can stop another search
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Counters gathered by one search
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Sum of every worker's table
    pub totals: PlayoutTable,
    /// One table per worker, in worker order
    pub per_worker: Vec<PlayoutTable>,
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn total_playouts(&self) -> u64 {
        self.totals.total_plays()
    }

    /// Highest win-rate cell, if any playout was won
    pub fn best_cell(&self) -> Option<Coordinate> {
        self.totals.best_cell()
    }
}

// ============================================================================
// SEARCH LOOP (Level 2 - Main Coordination)
// ============================================================================

/// Run timed playouts from every empty cell on `config.workers` workers.
///
/// Workers each get their own RNG seeded with `seed + worker index`; without
/// a configured seed a random base is drawn.
pub fn run_search(
    board: &BoardState,
    player: Player,
    config: &RolloutConfig,
    cancel: &CancelToken,
) -> Result<SearchResult> {
    let cells = board.empty_cells();
    if cells.is_empty() {
        return Err(HexError::NoValidMoves);
    }

    let started = Instant::now();
    // An unrepresentable deadline means "until cancelled"
    let deadline = started.checked_add(config.time_budget);
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let workers = config.workers.max(1);

    let per_worker = (0..workers)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            run_worker(board, player, &cells, deadline, cancel, seed)
        })
        .collect::<Result<Vec<PlayoutTable>>>()?;

    let mut totals = PlayoutTable::new(board.width(), board.height());
    for table in &per_worker {
        totals.merge(table);
    }

    let elapsed = started.elapsed();
    debug!(
        player = %player,
        workers,
        playouts = totals.total_plays(),
        elapsed_ms = elapsed.as_millis() as u64,
        "rollout search finished"
    );

    Ok(SearchResult {
        totals,
        per_worker,
        elapsed,
    })
}

// ============================================================================
// WORKER (Level 3)
// ============================================================================

/// Sweep `cells` until the deadline or cancellation; always at least once
fn run_worker(
    board: &BoardState,
    player: Player,
    cells: &[Coordinate],
    deadline: Option<Instant>,
    cancel: &CancelToken,
    seed: u64,
) -> Result<PlayoutTable> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut table = PlayoutTable::new(board.width(), board.height());

    loop {
        for &cell in cells {
            let won = random_playout(board, player, cell, &mut rng)?;
            table.record(cell, won);
        }
        let expired = deadline.map_or(false, |d| Instant::now() >= d);
        if expired || cancel.is_cancelled() {
            break;
        }
    }

    Ok(table)
}

// ============================================================================
// TESTS
// ============================================================================
