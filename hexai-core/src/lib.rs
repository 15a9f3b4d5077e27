//! HEXAI Core - Board model and graph search
//!
//! This crate provides the core engine pieces for playing Hex:
//! - Board geometry (rhombic grid, neighbors and bridges)
//! - Board state with turn order, concession and win detection
//! - Per-color connection graph with incremental updates
//! - Two-ply lookahead over shortest-path distances

pub mod board;
pub mod connectivity;
pub mod error;
pub mod game;
pub mod graph;
pub mod lookahead;
pub mod potential;

// Re-exports for convenient access
pub use board::{Coordinate, BRIDGE_OFFSETS, DIRECTIONS};
pub use connectivity::has_connection;
pub use error::{HexError, Result};
pub use game::{BoardState, Move, Player};
pub use graph::{
    Edge, EdgeId, EdgeType, GraphModel, Node, NodeId, NodeType, BLOCKED_WEIGHT_MODIFIER,
    GRAPH_SEARCH_CELL_LIMIT, OBTAINED_BRIDGE_WEIGHT_MODIFIER, PLAYER_WEIGHT,
    SEMI_OBTAINED_BRIDGE_WEIGHT_MODIFIER, STANDARD_EDGE_WEIGHT_MODIFIER,
    UNOBTAINED_BRIDGE_WEIGHT_MODIFIER, UNSET_WEIGHT,
};
pub use lookahead::{select_best, GraphSearch};
pub use potential::PotentialMove;
