//! Weighted connection graph for one color
//!
//! Every cell becomes a node, plus a synthetic start and end node joined to
//! the color's two edges. The shortest start-to-end path estimates how many
//! stones the color still needs.
//!
//! Nodes and edges live in arenas and refer to each other by index, so the
//! graph can be mutated in place during lookahead.
//!
//! ## Architecture
//! - Level 2: Construction, `change_node`, `distance`
//! - Level 3: Edge rules (standard, bridge, start/end)
//! - Level 4: Arena bookkeeping, blocking flags

use crate::board::Coordinate;
use crate::error::{HexError, Result};
use crate::game::{BoardState, Player};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Weight of an empty cell
pub const UNSET_WEIGHT: f64 = 2.0;

/// Weight of a cell the graph's color already owns
pub const PLAYER_WEIGHT: f64 = 0.0;

pub const STANDARD_EDGE_WEIGHT_MODIFIER: f64 = 0.0;

/// Bridge between two owned cells
pub const OBTAINED_BRIDGE_WEIGHT_MODIFIER: f64 = 0.01;

/// Bridge where one end is owned and the other empty
pub const SEMI_OBTAINED_BRIDGE_WEIGHT_MODIFIER: f64 = 1.01;

/// Bridge between two empty cells
pub const UNOBTAINED_BRIDGE_WEIGHT_MODIFIER: f64 = 1.01;

/// Added when a standard edge joins two blocked cells
pub const BLOCKED_WEIGHT_MODIFIER: f64 = 1000.0;

/// Boards larger than this are left to the rollout search
pub const GRAPH_SEARCH_CELL_LIMIT: usize = 196;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into the node arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Edge identifier (index into the edge arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Role of a node from the graph color's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Player,
    Opponent,
    Unset,
    StartEnd,
}

impl NodeType {
    /// Classify a board cell for `player`
    pub fn for_cell(stone: Option<Player>, player: Player) -> Self {
        match stone {
            None => NodeType::Unset,
            Some(p) if p == player => NodeType::Player,
            Some(_) => NodeType::Opponent,
        }
    }

    /// Weight a node of this type carries when built from a board
    pub fn default_weight(self) -> Option<f64> {
        match self {
            NodeType::Player | NodeType::StartEnd => Some(PLAYER_WEIGHT),
            NodeType::Unset => Some(UNSET_WEIGHT),
            NodeType::Opponent => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeType {
    Standard,
    Bridge,
    StartEnd,
}

/// A cell (or terminal) in the graph
#[derive(Clone, Debug)]
pub struct Node {
    /// `None` for the start and end nodes
    pub position: Option<Coordinate>,
    pub node_type: NodeType,
    /// `None` for opponent cells
    pub weight: Option<f64>,
    /// Set by the last `distance` query
    pub distance: Option<f64>,
    pub blocked: bool,
    edges: Vec<EdgeId>,
}

impl Node {
    fn new(position: Option<Coordinate>, node_type: NodeType, weight: Option<f64>) -> Self {
        Self {
            position,
            node_type,
            weight,
            distance: None,
            blocked: false,
            edges: Vec::new(),
        }
    }

    /// Incident edges
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// Undirected weighted edge
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub nodes: [NodeId; 2],
    pub edge_type: EdgeType,
    pub modifier: f64,
    /// Mean of the endpoint weights plus the modifier
    pub weight: f64,
}

impl Edge {
    /// Endpoint opposite `node`
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.nodes[0] == node {
            self.nodes[1]
        } else {
            self.nodes[0]
        }
    }

    fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.nodes[0] == a && self.nodes[1] == b) || (self.nodes[0] == b && self.nodes[1] == a)
    }
}

/// Dijkstra frontier entry, smallest distance first
#[derive(Clone, Copy, Debug)]
struct Frontier {
    distance: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

// ============================================================================
// GRAPH MODEL
// ============================================================================

/// Connection graph of a board for one color
#[derive(Clone, Debug)]
pub struct GraphModel {
    player: Player,
    width: i32,
    height: i32,
    nodes: Vec<Node>,
    edges: Vec<Option<Edge>>,
    free_edges: Vec<EdgeId>,
    nodes_map: FxHashMap<Coordinate, NodeId>,
    start: NodeId,
    end: NodeId,
}

impl GraphModel {
    // ========================================================================
    // CONSTRUCTION (Level 2)
    // ========================================================================

    /// Build the graph of `board` as seen by `player`
    pub fn new(board: &BoardState, player: Player) -> Result<Self> {
        let (width, height) = (board.width(), board.height());
        let mut nodes = Vec::with_capacity(board.cell_count() + 2);
        let mut nodes_map = FxHashMap::default();

        for x in 0..width {
            for y in 0..height {
                let coord = Coordinate::new(x, y);
                let node_type = NodeType::for_cell(board.stone(coord), player);
                nodes_map.insert(coord, NodeId(nodes.len()));
                nodes.push(Node::new(Some(coord), node_type, node_type.default_weight()));
            }
        }

        let start = NodeId(nodes.len());
        nodes.push(Node::new(None, NodeType::StartEnd, Some(PLAYER_WEIGHT)));
        let end = NodeId(nodes.len());
        nodes.push(Node::new(None, NodeType::StartEnd, Some(PLAYER_WEIGHT)));

        let mut graph = Self {
            player,
            width,
            height,
            nodes,
            edges: Vec::new(),
            free_edges: Vec::new(),
            nodes_map,
            start,
            end,
        };

        let cells: Vec<NodeId> = (0..start.0).map(NodeId).collect();
        for &id in &cells {
            if graph.nodes[id.0].node_type != NodeType::Opponent {
                graph.add_standard_edges(id)?;
            }
        }
        for &id in &cells {
            if graph.nodes[id.0].node_type != NodeType::Opponent {
                graph.add_bridges(id)?;
            }
        }
        graph.join_terminals()?;
        for &id in &cells {
            graph.refresh_blocked(id);
        }

        Ok(graph)
    }

    /// Retype a cell and repair every edge that depends on it.
    ///
    /// The result matches a graph freshly built from the mutated board.
    pub fn change_node(
        &mut self,
        coord: Coordinate,
        node_type: NodeType,
        weight: Option<f64>,
    ) -> Result<()> {
        let id = self.node_id(coord).ok_or(HexError::PositionNotFound(coord))?;
        if node_type == NodeType::StartEnd {
            return Err(HexError::InvalidNodeType(coord));
        }
        if node_type != NodeType::Opponent && weight.is_none() {
            return Err(HexError::NodeWeightUnset(Some(coord)));
        }

        let node = &mut self.nodes[id.0];
        node.node_type = node_type;
        node.weight = if node_type == NodeType::Opponent { None } else { weight };

        self.clear_edges(id);
        if node_type != NodeType::Opponent {
            self.add_standard_edges(id)?;
        }

        let neighbors: Vec<NodeId> = coord
            .neighbors(self.width, self.height)
            .filter_map(|c| self.node_id(c))
            .collect();
        for &n in &neighbors {
            self.clear_bridges(n);
        }
        for &n in &neighbors {
            if self.nodes[n.0].node_type != NodeType::Opponent {
                self.add_bridges(n)?;
            }
        }
        if node_type != NodeType::Opponent {
            self.add_bridges(id)?;
        }

        let line = self.line_of(coord);
        if line <= 2 || line >= self.line_count() - 3 {
            self.join_terminals()?;
        }

        self.refresh_blocked(id);
        for &n in &neighbors {
            self.refresh_blocked(n);
        }
        Ok(())
    }

    // ========================================================================
    // SHORTEST PATH (Level 2)
    // ========================================================================

    /// Shortest start-to-end distance, `None` if the end is unreachable.
    ///
    /// Every node's `distance` field is left holding its settled value.
    pub fn distance(&mut self) -> Option<f64> {
        self.reset();

        let mut settled = vec![false; self.nodes.len()];
        let mut frontier = BinaryHeap::new();
        self.nodes[self.start.0].distance = Some(0.0);
        frontier.push(Frontier {
            distance: 0.0,
            node: self.start,
        });

        while let Some(Frontier { distance, node }) = frontier.pop() {
            if settled[node.0] {
                continue;
            }
            settled[node.0] = true;
            if node == self.end {
                break;
            }

            let incident = self.nodes[node.0].edges.clone();
            for edge_id in incident {
                let Some(edge) = self.edges[edge_id.0].as_ref() else {
                    continue;
                };
                let next = edge.other(node);
                if settled[next.0] {
                    continue;
                }
                let mut candidate = distance + edge.weight;
                if edge.edge_type == EdgeType::Standard
                    && self.nodes[node.0].blocked
                    && self.nodes[next.0].blocked
                {
                    candidate += BLOCKED_WEIGHT_MODIFIER;
                }
                let improves = self.nodes[next.0]
                    .distance
                    .map_or(true, |current| candidate < current);
                if improves {
                    self.nodes[next.0].distance = Some(candidate);
                    frontier.push(Frontier {
                        distance: candidate,
                        node: next,
                    });
                }
            }
        }

        self.nodes[self.end.0].distance
    }

    /// Forget the distances from the last query
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.distance = None;
        }
    }

    // ========================================================================
    // ACCESSORS (Level 3)
    // ========================================================================

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn node_id(&self, coord: Coordinate) -> Option<NodeId> {
        self.nodes_map.get(&coord).copied()
    }

    pub fn node(&self, coord: Coordinate) -> Option<&Node> {
        self.node_id(coord).map(|id| &self.nodes[id.0])
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_type(&self, coord: Coordinate) -> Option<NodeType> {
        self.node(coord).map(|n| n.node_type)
    }

    pub fn node_weight(&self, coord: Coordinate) -> Option<f64> {
        self.node(coord).and_then(|n| n.weight)
    }

    pub fn start_id(&self) -> NodeId {
        self.start
    }

    pub fn end_id(&self) -> NodeId {
        self.end
    }

    pub fn start(&self) -> &Node {
        &self.nodes[self.start.0]
    }

    pub fn end(&self) -> &Node {
        &self.nodes[self.end.0]
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0).and_then(Option::as_ref)
    }

    /// The edge joining `a` and `b`, if any
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.find_edge(a, b).and_then(|id| self.edge(id))
    }

    /// All live edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter_map(Option::as_ref)
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    // ========================================================================
    // EDGE RULES (Level 3)
    // ========================================================================

    fn add_standard_edges(&mut self, id: NodeId) -> Result<()> {
        let Some(coord) = self.nodes[id.0].position else {
            return Ok(());
        };
        let neighbors: Vec<NodeId> = coord
            .neighbors(self.width, self.height)
            .filter_map(|c| self.node_id(c))
            .collect();
        for n in neighbors {
            if self.nodes[n.0].node_type != NodeType::Opponent {
                self.add_edge(id, n, EdgeType::Standard, STANDARD_EDGE_WEIGHT_MODIFIER)?;
            }
        }
        Ok(())
    }

    /// Bridges from a cell to every partner whose two carriers are empty
    fn add_bridges(&mut self, id: NodeId) -> Result<()> {
        let Some(coord) = self.nodes[id.0].position else {
            return Ok(());
        };
        let own_type = self.nodes[id.0].node_type;
        let partners: Vec<Coordinate> = coord.bridges(self.width, self.height).collect();

        for partner in partners {
            let Some(partner_id) = self.node_id(partner) else {
                continue;
            };
            let partner_type = self.nodes[partner_id.0].node_type;
            if partner_type == NodeType::Opponent {
                continue;
            }
            let Some(carriers) = coord.bridge_carriers(partner) else {
                continue;
            };
            if !carriers.iter().all(|&c| self.is_unset(c)) {
                continue;
            }
            let modifier = match (own_type, partner_type) {
                (NodeType::Player, NodeType::Player) => OBTAINED_BRIDGE_WEIGHT_MODIFIER,
                (NodeType::Unset, NodeType::Unset) => UNOBTAINED_BRIDGE_WEIGHT_MODIFIER,
                _ => SEMI_OBTAINED_BRIDGE_WEIGHT_MODIFIER,
            };
            self.add_edge(id, partner_id, EdgeType::Bridge, modifier)?;
        }
        Ok(())
    }

    /// Rebuild every edge of the start and end nodes
    fn join_terminals(&mut self) -> Result<()> {
        self.clear_edges(self.start);
        self.clear_edges(self.end);

        let last = self.line_count() - 1;
        for (terminal, line, inner) in [(self.start, 0, 1), (self.end, last, last - 1)] {
            for i in 0..self.line_len() {
                let coord = self.line_cell(line, i);
                let Some(id) = self.node_id(coord) else {
                    continue;
                };
                if self.nodes[id.0].node_type != NodeType::Opponent {
                    self.add_edge(terminal, id, EdgeType::StartEnd, STANDARD_EDGE_WEIGHT_MODIFIER)?;
                }
            }

            if inner < 0 || inner > last {
                continue;
            }
            for i in 1..self.line_len() - 1 {
                let coord = self.line_cell(inner, i);
                let Some(id) = self.node_id(coord) else {
                    continue;
                };
                let modifier = match self.nodes[id.0].node_type {
                    NodeType::Player => OBTAINED_BRIDGE_WEIGHT_MODIFIER,
                    NodeType::Unset => SEMI_OBTAINED_BRIDGE_WEIGHT_MODIFIER,
                    _ => continue,
                };
                let free_on_line = coord
                    .neighbors(self.width, self.height)
                    .filter(|&c| self.line_of(c) == line && self.is_unset(c))
                    .count();
                if free_on_line == 2 {
                    self.add_edge(terminal, id, EdgeType::Bridge, modifier)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // ARENA BOOKKEEPING (Level 4)
    // ========================================================================

    /// Join `a` and `b` unless they are already joined
    fn add_edge(&mut self, a: NodeId, b: NodeId, edge_type: EdgeType, modifier: f64) -> Result<()> {
        if self.find_edge(a, b).is_some() {
            return Ok(());
        }
        let wa = self.nodes[a.0]
            .weight
            .ok_or(HexError::NodeWeightUnset(self.nodes[a.0].position))?;
        let wb = self.nodes[b.0]
            .weight
            .ok_or(HexError::NodeWeightUnset(self.nodes[b.0].position))?;

        let edge = Edge {
            nodes: [a, b],
            edge_type,
            modifier,
            weight: (wa + wb) / 2.0 + modifier,
        };
        let id = match self.free_edges.pop() {
            Some(id) => {
                self.edges[id.0] = Some(edge);
                id
            }
            None => {
                self.edges.push(Some(edge));
                EdgeId(self.edges.len() - 1)
            }
        };
        self.nodes[a.0].edges.push(id);
        self.nodes[b.0].edges.push(id);
        Ok(())
    }

    fn find_edge(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.nodes[a.0]
            .edges
            .iter()
            .copied()
            .find(|id| matches!(&self.edges[id.0], Some(e) if e.joins(a, b)))
    }

    fn remove_edge(&mut self, id: EdgeId) {
        if let Some(edge) = self.edges[id.0].take() {
            for node in edge.nodes {
                self.nodes[node.0].edges.retain(|&e| e != id);
            }
            self.free_edges.push(id);
        }
    }

    fn clear_edges(&mut self, id: NodeId) {
        let incident = std::mem::take(&mut self.nodes[id.0].edges);
        for edge in incident {
            self.remove_edge(edge);
        }
    }

    fn clear_bridges(&mut self, id: NodeId) {
        let bridges: Vec<EdgeId> = self.nodes[id.0]
            .edges
            .iter()
            .copied()
            .filter(|e| {
                matches!(&self.edges[e.0], Some(edge) if edge.edge_type == EdgeType::Bridge)
            })
            .collect();
        for edge in bridges {
            self.remove_edge(edge);
        }
    }

    /// An empty cell touching an opponent stone is blocked
    fn refresh_blocked(&mut self, id: NodeId) {
        let blocked = match (self.nodes[id.0].node_type, self.nodes[id.0].position) {
            (NodeType::Unset, Some(coord)) => coord
                .neighbors(self.width, self.height)
                .any(|c| self.node_type(c) == Some(NodeType::Opponent)),
            _ => false,
        };
        self.nodes[id.0].blocked = blocked;
    }

    fn is_unset(&self, coord: Coordinate) -> bool {
        self.node_type(coord) == Some(NodeType::Unset)
    }

    /// Index of the line `coord` lies on, counted from the start edge
    fn line_of(&self, coord: Coordinate) -> i32 {
        match self.player {
            Player::Red => coord.y,
            Player::Blue => coord.x,
        }
    }

    fn line_count(&self) -> i32 {
        match self.player {
            Player::Red => self.height,
            Player::Blue => self.width,
        }
    }

    fn line_len(&self) -> i32 {
        match self.player {
            Player::Red => self.width,
            Player::Blue => self.height,
        }
    }

    fn line_cell(&self, line: i32, i: i32) -> Coordinate {
        match self.player {
            Player::Red => Coordinate::new(i, line),
            Player::Blue => Coordinate::new(line, i),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
