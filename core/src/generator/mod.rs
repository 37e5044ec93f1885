use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Chooses where the mines of a round go.
pub trait MineGenerator {
    /// Returns up to `count` distinct positions inside a `width × height` field, none of them
    /// in `excluded`.
    ///
    /// Excluded positions outside the field exclude nothing.
    fn generate(
        &mut self,
        width: Coord,
        height: Coord,
        count: CellCount,
        excluded: &HashSet<Position>,
    ) -> Vec<Position>;
}

/// How many tiles of a `width × height` field may hold a mine.
pub(crate) fn available_tiles(width: Coord, height: Coord, excluded: &HashSet<Position>) -> CellCount {
    let blocked = excluded.iter().filter(|pos| pos.is_within(width, height)).count();
    mult(width, height).saturating_sub(CellCount::try_from(blocked).unwrap_or(CellCount::MAX))
}
