//! Scored two-ply move sequences

use crate::board::Coordinate;

/// A candidate move together with the opponent's best replies to it.
///
/// Distances are shortest-path estimates after both stones are placed;
/// `None` means the color can no longer connect.
#[derive(Clone, Debug, PartialEq)]
pub struct PotentialMove {
    pub first: Coordinate,
    /// Replies that tie for the lowest value; empty when no cell was left
    pub replies: Vec<Coordinate>,
    pub ai_distance: Option<f64>,
    pub opponent_distance: Option<f64>,
}

impl PotentialMove {
    pub fn new(
        first: Coordinate,
        reply: Option<Coordinate>,
        ai_distance: Option<f64>,
        opponent_distance: Option<f64>,
    ) -> Self {
        Self {
            first,
            replies: reply.into_iter().collect(),
            ai_distance,
            opponent_distance,
        }
    }

    /// How much further the opponent is from connecting than we are.
    ///
    /// A blocked opponent scores `+inf`, a blocked mover `-inf`.
    pub fn value(&self) -> f64 {
        match (self.ai_distance, self.opponent_distance) {
            (_, None) => f64::INFINITY,
            (None, Some(_)) => f64::NEG_INFINITY,
            (Some(ai), Some(opp)) => opp - ai,
        }
    }

    /// Number of replies sharing the retained value
    pub fn tied_count(&self) -> usize {
        self.replies.len()
    }

    pub fn add_reply(&mut self, reply: Coordinate) {
        self.replies.push(reply);
    }
}
