use core::fmt;

use serde::{Deserialize, Serialize};

/// Single coordinate axis used for field width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-tile counts.
pub type CellCount = u32;

/// Column (`x`) and row (`y`) of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Whether the position lies inside a `width × height` field.
    pub const fn is_within(self, width: Coord, height: Coord) -> bool {
        self.x < width && self.y < height
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Fields are stored row-major, so the ndarray index is `[y, x]`.
impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.y.into(), self.x.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount) * (b as CellCount)
}

const DISPLACEMENTS: [(i16, i16); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `position`, returning a value only when it remains in bounds.
///
/// A neighbour left of column 0 or above row 0 is out of bounds; it is never
/// allowed to wrap around into a large in-range coordinate.
fn apply_delta(position: Position, delta: (i16, i16), width: Coord, height: Coord) -> Option<Position> {
    let (dx, dy) = delta;

    let x = position.x.checked_add_signed(dx)?;
    if x >= width {
        return None;
    }

    let y = position.y.checked_add_signed(dy)?;
    if y >= height {
        return None;
    }

    Some(Position { x, y })
}

/// Iterates the up-to-8 in-bounds neighbours of a tile.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Position,
    width: Coord,
    height: Coord,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Position, width: Coord, height: Coord) -> Self {
        Self {
            center,
            width,
            height,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                DISPLACEMENTS[usize::from(self.index)],
                self.width,
                self.height,
            );
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn corner_has_three_neighbors_and_no_wraparound() {
        let neighbors: Vec<_> = NeighborIter::new(Position::new(0, 0), 4, 4).collect();

        assert_eq!(
            neighbors,
            [Position::new(1, 0), Position::new(0, 1), Position::new(1, 1)]
        );
    }

    #[test]
    fn far_corner_stays_inside_bounds() {
        let neighbors: Vec<_> = NeighborIter::new(Position::new(3, 2), 4, 3).collect();

        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|pos| pos.is_within(4, 3)));
    }

    #[test]
    fn max_coordinate_does_not_overflow() {
        let center = Position::new(Coord::MAX, Coord::MAX);
        let neighbors: Vec<_> = NeighborIter::new(center, Coord::MAX, Coord::MAX).collect();

        assert_eq!(neighbors, [Position::new(Coord::MAX - 1, Coord::MAX - 1)]);
    }

    #[test]
    fn interior_tile_has_eight_neighbors() {
        assert_eq!(NeighborIter::new(Position::new(1, 1), 3, 3).count(), 8);
    }

    #[test]
    fn single_row_field() {
        let neighbors: Vec<_> = NeighborIter::new(Position::new(1, 0), 3, 1).collect();
        assert_eq!(neighbors, [Position::new(0, 0), Position::new(2, 0)]);
    }
}
