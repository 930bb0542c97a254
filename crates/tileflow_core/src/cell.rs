//! Cell positions and cell sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single grid coordinate. North is `+y`.
///
/// Coordinates are signed: intermediate modifier results are allowed to leave
/// the grid transiently and are clipped against a [`GridRect`](crate::GridRect)
/// before any tile resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position offset by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The adjacent position in `direction`.
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

impl From<(i32, i32)> for CellPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// The eight neighbor directions, cardinals first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// The `(dx, dy)` step for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, 1),
            Direction::NorthEast => (1, 1),
            Direction::SouthWest => (-1, -1),
            Direction::SouthEast => (1, -1),
        }
    }
}

/// Which neighbors participate in an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Neighborhood {
    /// N/S/W/E only.
    #[default]
    Four,
    /// Cardinals plus diagonals.
    Eight,
}

impl Neighborhood {
    /// The directions belonging to this neighborhood.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Neighborhood::Four => &Direction::CARDINAL,
            Neighborhood::Eight => &Direction::ALL,
        }
    }
}

/// An ordered set of unique cell positions.
///
/// Backed by a `BTreeSet` so iteration order is deterministic - stochastic
/// modifiers must visit cells in a reproducible order for a given seed.
/// Serialized as a flat list of positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellSet {
    cells: BTreeSet<CellPos>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains(&pos)
    }

    /// Insert a position. Returns `true` if it was not already present.
    pub fn insert(&mut self, pos: CellPos) -> bool {
        self.cells.insert(pos)
    }

    /// Remove a position. Returns `true` if it was present.
    pub fn remove(&mut self, pos: CellPos) -> bool {
        self.cells.remove(&pos)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterate positions in ascending `(x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells.iter().copied()
    }

    /// All positions of `other` added to `self`.
    pub fn union(&self, other: &CellSet) -> CellSet {
        Self {
            cells: self.cells.union(&other.cells).copied().collect(),
        }
    }

    /// All positions of `other` removed from `self`.
    pub fn subtract(&self, other: &CellSet) -> CellSet {
        Self {
            cells: self.cells.difference(&other.cells).copied().collect(),
        }
    }

    /// Positions present in both sets.
    pub fn intersect(&self, other: &CellSet) -> CellSet {
        Self {
            cells: self.cells.intersection(&other.cells).copied().collect(),
        }
    }

    /// Positions present in exactly one of the two sets.
    pub fn symmetric_difference(&self, other: &CellSet) -> CellSet {
        Self {
            cells: self
                .cells
                .symmetric_difference(&other.cells)
                .copied()
                .collect(),
        }
    }

    /// Only the positions inside `rect`.
    pub fn clipped(&self, rect: crate::GridRect) -> CellSet {
        self.iter().filter(|&p| rect.contains(p)).collect()
    }
}

impl FromIterator<CellPos> for CellSet {
    fn from_iter<I: IntoIterator<Item = CellPos>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<CellPos> for CellSet {
    fn extend<I: IntoIterator<Item = CellPos>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = CellPos;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, CellPos>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}
