#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use action::*;
pub use color::*;
pub use config::*;
pub use cursor::*;
pub use engine::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod action;
mod color;
mod config;
mod cursor;
mod engine;
mod error;
mod game;
mod generator;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Same checks the engine applies when it is sized and budgeted.
    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every failed check, one per field at most.
    pub fn problems(&self) -> Vec<GameError> {
        let mut problems = Vec::new();
        if self.width == 0 {
            problems.push(GameError::ZeroDimension { param: "field width" });
        }
        if self.height == 0 {
            problems.push(GameError::ZeroDimension { param: "field height" });
        }
        if self.mines == 0 {
            problems.push(GameError::ZeroMineCount);
        } else if self.mines >= self.total_tiles() {
            problems.push(GameError::TooManyMines);
        }
        problems
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(16, 16, 40)
    }
}

/// Result of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
    /// The flag completed the round.
    Won,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of opening a tile, or a batch of tiles when chording.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    // a chord can open a mine and complete the field in the same batch, the mine decides
    const fn rank(self) -> u8 {
        match self {
            Self::NoChange => 0,
            Self::Revealed => 1,
            Self::Won => 2,
            Self::HitMine => 3,
        }
    }
}

/// Keeps the higher ranked of two outcomes.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        if rhs.rank() > self.rank() { rhs } else { self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_config_validation_matches_engine() {
        assert_eq!(GameConfig::new(9, 9, 10).validate(), Ok(()));
        assert_eq!(
            GameConfig::new(0, 9, 10).validate(),
            Err(GameError::ZeroDimension { param: "field width" })
        );
        assert_eq!(GameConfig::new(3, 3, 0).validate(), Err(GameError::ZeroMineCount));
        assert_eq!(GameConfig::new(3, 3, 9).validate(), Err(GameError::TooManyMines));
    }

    #[test]
    fn problems_reports_each_field() {
        assert_eq!(
            GameConfig::new(0, 0, 0).problems(),
            [
                GameError::ZeroDimension { param: "field width" },
                GameError::ZeroDimension { param: "field height" },
                GameError::ZeroMineCount,
            ]
        );
        assert!(GameConfig::default().problems().is_empty());
    }

    #[test]
    fn reveal_outcome_merge_prefers_mine() {
        use RevealOutcome::*;
        assert_eq!(Revealed | HitMine | Won, HitMine);
        assert_eq!(NoChange | Won, Won);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
    }
}
