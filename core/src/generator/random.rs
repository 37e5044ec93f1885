use alloc::vec::Vec;
use hashbrown::HashSet;
use rand::prelude::*;

use super::*;

/// Uniform placement by rejection sampling: draw a random tile and keep it
/// unless it is excluded or was already drawn.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(
        &mut self,
        width: Coord,
        height: Coord,
        count: CellCount,
        excluded: &HashSet<Position>,
    ) -> Vec<Position> {
        let available = available_tiles(width, height, excluded);
        let count = if count > available {
            log::warn!(
                "Cannot fit {} mines around the excluded tiles, placing {} instead",
                count,
                available
            );
            available
        } else {
            count
        };

        let capacity = usize::try_from(count).unwrap_or_default();
        let mut chosen: HashSet<Position> = HashSet::with_capacity(capacity);
        let mut mines = Vec::with_capacity(capacity);
        let mut draws: u64 = 0;

        while mines.len() < capacity {
            let position = Position {
                x: self.rng.random_range(0..width),
                y: self.rng.random_range(0..height),
            };
            draws += 1;
            if !excluded.contains(&position) && chosen.insert(position) {
                mines.push(position);
            }
        }

        log::debug!(
            "Placed {} mines in {} draws, {} tiles excluded",
            mines.len(),
            draws,
            excluded.len()
        );
        mines
    }
}
