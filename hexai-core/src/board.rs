//! Hex board geometry on a rhombic grid

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid position, `x` is the column and `y` the row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this coordinate is on a `width` x `height` board
    pub fn is_valid(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }

    /// Component-wise sum
    pub fn add(&self, other: Coordinate) -> Coordinate {
        Coordinate::new(self.x + other.x, self.y + other.y)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Coordinate {
        let (dx, dy) = DIRECTIONS[direction as usize % 6];
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// On-board hex neighbors, in `DIRECTIONS` order
    pub fn neighbors(&self, width: i32, height: i32) -> impl Iterator<Item = Coordinate> + '_ {
        offsets_within(*self, &DIRECTIONS, width, height)
    }

    /// On-board bridge partners, in `BRIDGE_OFFSETS` order
    pub fn bridges(&self, width: i32, height: i32) -> impl Iterator<Item = Coordinate> + '_ {
        offsets_within(*self, &BRIDGE_OFFSETS, width, height)
    }

    /// Check if `other` is one of the six hex neighbors
    pub fn is_adjacent(&self, other: Coordinate) -> bool {
        DIRECTIONS
            .iter()
            .any(|&(dx, dy)| self.x + dx == other.x && self.y + dy == other.y)
    }

    /// The two cells adjacent to both `self` and `other`, if they form a bridge.
    ///
    /// Positions may lie off the board; callers filter.
    pub fn bridge_carriers(&self, other: Coordinate) -> Option<[Coordinate; 2]> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if !BRIDGE_OFFSETS.contains(&(dx, dy)) {
            return None;
        }
        let mut carriers = DIRECTIONS
            .iter()
            .map(|&(nx, ny)| Coordinate::new(self.x + nx, self.y + ny))
            .filter(|c| other.is_adjacent(*c));
        match (carriers.next(), carriers.next()) {
            (Some(a), Some(b)) => Some([a, b]),
            _ => None,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

fn offsets_within(
    origin: Coordinate,
    offsets: &'static [(i32, i32); 6],
    width: i32,
    height: i32,
) -> impl Iterator<Item = Coordinate> {
    offsets
        .iter()
        .map(move |&(dx, dy)| Coordinate::new(origin.x + dx, origin.y + dy))
        .filter(move |c| c.is_valid(width, height))
}

/// Hex-adjacent offsets (dx, dy)
pub const DIRECTIONS: [(i32, i32); 6] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (0, -1),
    (1, 0),
    (1, -1),
];

/// Offsets of cells joined by a bridge: two cells sharing exactly two common neighbors
pub const BRIDGE_OFFSETS: [(i32, i32); 6] = [
    (-2, 1),
    (-1, -1),
    (1, -2),
    (2, -1),
    (1, 1),
    (-1, 2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(0, 0).is_valid(3, 4));
        assert!(Coordinate::new(2, 3).is_valid(3, 4));
        assert!(!Coordinate::new(3, 0).is_valid(3, 4));
        assert!(!Coordinate::new(0, 4).is_valid(3, 4));
        assert!(!Coordinate::new(-1, 0).is_valid(3, 4));
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let corner: Vec<_> = Coordinate::new(0, 0).neighbors(5, 5).collect();
        assert_eq!(corner, vec![Coordinate::new(0, 1), Coordinate::new(1, 0)]);

        let inner: Vec<_> = Coordinate::new(2, 2).neighbors(5, 5).collect();
        assert_eq!(inner.len(), 6);
    }

    #[test]
    fn test_every_bridge_has_two_carriers() {
        let origin = Coordinate::new(5, 5);
        for &(dx, dy) in &BRIDGE_OFFSETS {
            let partner = Coordinate::new(5 + dx, 5 + dy);
            let carriers = origin.bridge_carriers(partner).expect("bridge offset");
            for c in carriers {
                assert!(origin.is_adjacent(c));
                assert!(partner.is_adjacent(c));
            }
            assert!(!origin.is_adjacent(partner));
        }
    }

    #[test]
    fn test_non_bridge_has_no_carriers() {
        let origin = Coordinate::new(2, 2);
        assert!(origin.bridge_carriers(Coordinate::new(3, 2)).is_none());
        assert!(origin.bridge_carriers(Coordinate::new(4, 4)).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new(3, 7).to_string(), "(3,7)");
    }
}
