//! Two-ply graph search
//!
//! For every empty cell we play it, let the opponent answer with every other
//! empty cell, and keep the answer that hurts us most. The cell whose worst
//! answer is least bad wins.
//!
//! ## Architecture
//! - Level 2: `GraphSearch::best_move`, parallel evaluation over buckets
//! - Level 3: Per-bucket lookahead on a private pair of graphs
//! - Level 4: Selection among scored moves

use crate::board::Coordinate;
use crate::error::{HexError, Result};
use crate::game::{BoardState, Move, Player};
use crate::graph::{GraphModel, NodeType, PLAYER_WEIGHT};
use crate::potential::PotentialMove;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

// ============================================================================
// GRAPH SEARCH (Level 2)
// ============================================================================

/// Two-ply lookahead over shortest-path distances
#[derive(Clone, Debug)]
pub struct GraphSearch {
    workers: usize,
    rng: ChaCha8Rng,
}

impl Default for GraphSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphSearch {
    /// One bucket per rayon thread, fixed seed
    pub fn new() -> Self {
        Self {
            workers: rayon::current_num_threads(),
            rng: ChaCha8Rng::seed_from_u64(42),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// Number of buckets the candidates are dealt into (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Pick a move for `player`.
    ///
    /// Returns `Move::Concede` when every candidate leaves us unable to
    /// connect. A single empty cell is always played.
    pub fn best_move(&mut self, board: &BoardState, player: Player) -> Result<Move> {
        let candidates = board.empty_cells();
        match candidates.as_slice() {
            [] => return Err(HexError::NoValidMoves),
            [only] => return Ok(Move::Place(*only)),
            _ => {}
        }

        let moves = self.evaluate(board, player)?;
        let chosen = select_best(&moves, &mut self.rng).ok_or(HexError::NoValidMoves)?;
        debug!(
            player = %player,
            candidates = moves.len(),
            first = %chosen.first,
            value = chosen.value(),
            tied = chosen.tied_count(),
            "graph search finished"
        );

        if chosen.value() == f64::NEG_INFINITY {
            Ok(Move::Concede)
        } else {
            Ok(Move::Place(chosen.first))
        }
    }

    /// Score every empty cell, in bucket order.
    ///
    /// Candidates are dealt round-robin so each bucket gets a similar share
    /// of the board.
    pub fn evaluate(&self, board: &BoardState, player: Player) -> Result<Vec<PotentialMove>> {
        let empties = board.empty_cells();
        if empties.is_empty() {
            return Err(HexError::NoValidMoves);
        }

        let bucket_count = self.workers.min(empties.len());
        let mut buckets: Vec<Vec<Coordinate>> = vec![Vec::new(); bucket_count];
        for (i, &cell) in empties.iter().enumerate() {
            buckets[i % bucket_count].push(cell);
        }

        let scored: Vec<Vec<PotentialMove>> = buckets
            .par_iter()
            .map(|bucket| evaluate_bucket(board, player, bucket, &empties))
            .collect::<Result<Vec<_>>>()?;

        Ok(scored.into_iter().flatten().collect())
    }
}

// ============================================================================
// BUCKET EVALUATION (Level 3)
// ============================================================================

/// Node state to put back after a hypothetical placement
#[derive(Clone, Copy)]
struct Saved {
    coord: Coordinate,
    node_type: NodeType,
    weight: Option<f64>,
}

impl Saved {
    fn take(graph: &GraphModel, coord: Coordinate) -> Result<Self> {
        let node = graph.node(coord).ok_or(HexError::PositionNotFound(coord))?;
        Ok(Self {
            coord,
            node_type: node.node_type,
            weight: node.weight,
        })
    }

    fn restore(self, graph: &mut GraphModel) -> Result<()> {
        graph.change_node(self.coord, self.node_type, self.weight)
    }
}

/// Put our stone (or, with `ours` false, the opponent's) on `coord` in both graphs
fn occupy(
    own: &mut GraphModel,
    rival: &mut GraphModel,
    coord: Coordinate,
    ours: bool,
) -> Result<[Saved; 2]> {
    let saved = [Saved::take(own, coord)?, Saved::take(rival, coord)?];
    if ours {
        own.change_node(coord, NodeType::Player, Some(PLAYER_WEIGHT))?;
        rival.change_node(coord, NodeType::Opponent, None)?;
    } else {
        own.change_node(coord, NodeType::Opponent, None)?;
        rival.change_node(coord, NodeType::Player, Some(PLAYER_WEIGHT))?;
    }
    Ok(saved)
}

fn release(own: &mut GraphModel, rival: &mut GraphModel, saved: [Saved; 2]) -> Result<()> {
    saved[0].restore(own)?;
    saved[1].restore(rival)
}

fn evaluate_bucket(
    board: &BoardState,
    player: Player,
    bucket: &[Coordinate],
    empties: &[Coordinate],
) -> Result<Vec<PotentialMove>> {
    let mut own = GraphModel::new(board, player)?;
    let mut rival = GraphModel::new(board, player.opponent())?;
    let mut results = Vec::with_capacity(bucket.len());

    for &first in bucket {
        let first_saved = occupy(&mut own, &mut rival, first, true)?;

        let mut retained: Option<PotentialMove> = None;
        for &reply in empties.iter().filter(|&&c| c != first) {
            let reply_saved = occupy(&mut own, &mut rival, reply, false)?;
            let candidate =
                PotentialMove::new(first, Some(reply), own.distance(), rival.distance());
            release(&mut own, &mut rival, reply_saved)?;

            retained = match retained {
                None => Some(candidate),
                Some(mut kept) => {
                    if candidate.value() < kept.value() {
                        Some(candidate)
                    } else {
                        if candidate.value() == kept.value() {
                            kept.add_reply(reply);
                        }
                        Some(kept)
                    }
                }
            };
        }

        let scored = match retained {
            Some(pm) => pm,
            None => PotentialMove::new(first, None, own.distance(), rival.distance()),
        };
        release(&mut own, &mut rival, first_saved)?;
        results.push(scored);
    }

    Ok(results)
}

// ============================================================================
// SELECTION (Level 4)
// ============================================================================

/// Highest value, then most tied replies, then a random pick
pub fn select_best<'a, R: Rng>(
    moves: &'a [PotentialMove],
    rng: &mut R,
) -> Option<&'a PotentialMove> {
    let best_value = moves
        .iter()
        .map(PotentialMove::value)
        .fold(f64::NEG_INFINITY, f64::max);
    let top: Vec<&PotentialMove> = moves.iter().filter(|m| m.value() == best_value).collect();
    let most_tied = top.iter().map(|m| m.tied_count()).max()?;
    let finalists: Vec<&PotentialMove> = top
        .into_iter()
        .filter(|m| m.tied_count() == most_tied)
        .collect();
    finalists.choose(rng).copied()
}

// ============================================================================
// TESTS
// ============================================================================
