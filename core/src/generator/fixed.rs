use alloc::vec::Vec;
use hashbrown::HashSet;

use super::*;

/// Places mines at a predetermined layout, for reproducible rounds.
///
/// Positions outside the field, duplicates and excluded tiles are dropped, so
/// the layout may end up with fewer mines than listed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Position>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl IntoIterator<Item = Position>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(
        &mut self,
        width: Coord,
        height: Coord,
        count: CellCount,
        excluded: &HashSet<Position>,
    ) -> Vec<Position> {
        let mut mines: Vec<Position> = Vec::with_capacity(self.mines.len());
        for &position in &self.mines {
            if !position.is_within(width, height) || excluded.contains(&position) || mines.contains(&position) {
                log::warn!("Skipping fixed mine at {}", position);
                continue;
            }
            mines.push(position);
        }

        if CellCount::try_from(mines.len()).ok() != Some(count) {
            log::debug!("Fixed layout has {} mines, budget was {}", mines.len(), count);
        }
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_safe_duplicate_and_outside_positions() {
        let mut generator = FixedMineGenerator::new([
            Position::new(0, 0),
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(9, 0),
            Position::new(2, 1),
        ]);

        let excluded = HashSet::from([Position::new(1, 1)]);

        let mines = generator.generate(3, 2, 4, &excluded);

        assert_eq!(mines, [Position::new(0, 0), Position::new(2, 1)]);
    }
}
