use alloc::collections::{BTreeSet, VecDeque};
use core::num::Saturating;
use hashbrown::HashSet;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Field sized, mines not placed yet.
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}


/// Capabilities of a minefield, as seen by the command and presentation layers.
pub trait Minefield {
    /// Allocates a `width × height` field of closed safe tiles and starts a new round.
    fn set_field_size(&mut self, width: Coord, height: Coord) -> Result<()>;

    /// Records how many mines the next placement puts down. Ignored once the mines are placed.
    fn set_mine_count(&mut self, count: CellCount) -> Result<()>;

    /// Places the mines, keeping `safe` and any tile already opened or flagged clear.
    /// Only the first call of a round has an effect.
    fn set_mines(&mut self, safe: Position);

    fn open_tile(&mut self, position: Position) -> RevealOutcome;

    fn flag_toggle_tile(&mut self, position: Position) -> MarkOutcome;

    /// Stored tile, or [`Tile::OutOfBounds`] outside the field.
    fn tile_at(&self, position: Position) -> Tile;

    /// Read-only view of the whole field, indexed `[y, x]`.
    fn field(&self) -> ArrayView2<'_, Tile>;

    fn count_neighbouring_mines(&self, position: Position) -> u8;

    fn state(&self) -> EngineState;

    fn width(&self) -> Coord;

    fn height(&self) -> Coord;

    fn mine_count(&self) -> CellCount;

    fn flagged_count(&self) -> CellCount;

    fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    fn mines_left(&self) -> i64 {
        i64::from(self.mine_count()) - i64::from(self.flagged_count())
    }
}

#[derive(Clone, Debug)]
pub struct MinefieldEngine<G = RandomMineGenerator> {
    generator: G,
    field: Array2<Tile>,
    width: Coord,
    height: Coord,
    mine_count: CellCount,
    flagged_mine_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    open_count: Saturating<CellCount>,
    state: EngineState,
}

impl MinefieldEngine<RandomMineGenerator> {
    pub fn new(seed: u64) -> Self {
        Self::with_generator(RandomMineGenerator::new(seed))
    }
}

impl<G: MineGenerator> MinefieldEngine<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator,
            field: Array2::from_elem((0, 0), Tile::ClosedSafe),
            width: 0,
            height: 0,
            mine_count: 0,
            flagged_mine_count: Saturating(0),
            flagged_count: Saturating(0),
            open_count: Saturating(0),
            state: Default::default(),
        }
    }

    /// Sized and budgeted engine, the usual way to start a round from a [`GameConfig`].
    pub fn from_config(config: GameConfig, generator: G) -> Result<Self> {
        let mut engine = Self::with_generator(generator);
        engine.set_field_size(config.width, config.height)?;
        engine.set_mine_count(config.mines)?;
        Ok(engine)
    }

    pub fn open_count(&self) -> CellCount {
        self.open_count.0
    }

    fn total_tiles(&self) -> CellCount {
        mult(self.width, self.height)
    }

    fn set_tile(&mut self, position: Position, tile: Tile) {
        if position.is_within(self.width, self.height) {
            self.field[position.to_nd_index()] = tile;
        }
    }

    fn iter_neighbors(&self, position: Position) -> NeighborIter {
        NeighborIter::new(position, self.width, self.height)
    }

    fn count_flagged_neighbors(&self, position: Position) -> u8 {
        let count = self
            .iter_neighbors(position)
            .filter(|&pos| self.tile_at(pos).is_flagged())
            .count();
        // at most 8 neighbours
        count as u8
    }

    /// Opens one tile, following the transition table, and floods from it when it has no
    /// neighbouring mines.
    fn open_single_tile(&mut self, position: Position) -> RevealOutcome {
        use Tile::*;

        if self.state.is_finished() {
            return RevealOutcome::NoChange;
        }

        match self.tile_at(position) {
            OutOfBounds | OpenSafe => RevealOutcome::NoChange,
            tile @ (ClosedMine | FlaggedMine | OpenMine) => {
                if tile == FlaggedMine {
                    self.flagged_mine_count -= 1;
                    self.flagged_count -= 1;
                }
                self.set_tile(position, OpenMine);
                self.open_count += 1;
                self.state = EngineState::Lost;
                log::debug!("Opened mine at {}, round lost", position);
                RevealOutcome::HitMine
            }
            tile @ (ClosedSafe | FlaggedSafe) => {
                if tile == FlaggedSafe {
                    self.flagged_count -= 1;
                }
                self.set_tile(position, OpenSafe);
                self.open_count += 1;

                let count = self.count_neighbouring_mines(position);
                log::debug!("Opened tile at {}, neighbouring mines: {}", position, count);
                if count == 0 {
                    self.flood_fill(position);
                }

                self.check_win_condition();
                if self.state.is_finished() {
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
        }
    }

    /// Opens every closed safe tile reachable from `origin` through tiles with no
    /// neighbouring mines. `origin` itself must already be open.
    fn flood_fill(&mut self, origin: Position) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self
            .iter_neighbors(origin)
            .filter(|&pos| self.tile_at(pos) == Tile::ClosedSafe)
            .collect();
        log::trace!("Starting flood-fill from {}, initial neighbors: {:?}", origin, to_visit);

        while let Some(visit) = to_visit.pop_front() {
            if !visited.insert(visit) {
                continue;
            }

            // flagged, opened, and mine tiles stop the cascade
            if self.tile_at(visit) != Tile::ClosedSafe {
                continue;
            }

            self.set_tile(visit, Tile::OpenSafe);
            self.open_count += 1;

            let visit_count = self.count_neighbouring_mines(visit);
            log::trace!("Flood opened tile at {}, neighbouring mines: {}", visit, visit_count);

            if visit_count == 0 {
                let next: SmallVec<[Position; 8]> = self
                    .iter_neighbors(visit)
                    .filter(|&pos| self.tile_at(pos) == Tile::ClosedSafe)
                    .filter(|pos| !visited.contains(pos))
                    .collect();
                to_visit.extend(next);
            }
        }
    }

    /// Opens the closed, unflagged neighbours of an open tile when its number matches the
    /// flags around it.
    fn chord(&mut self, position: Position) -> RevealOutcome {
        let count = self.count_neighbouring_mines(position);
        let flagged = self.count_flagged_neighbors(position);
        if count != flagged {
            log::debug!(
                "Chord at {} ignored, {} mines but {} flags around it",
                position,
                count,
                flagged
            );
            return RevealOutcome::NoChange;
        }

        let targets: SmallVec<[Position; 8]> = self
            .iter_neighbors(position)
            .filter(|&pos| self.tile_at(pos).is_closed())
            .collect();

        targets
            .into_iter()
            .map(|target| self.open_single_tile(target))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor)
    }

    fn are_all_mines_flagged(&self) -> bool {
        self.flagged_count.0 == self.mine_count && self.mine_count == self.flagged_mine_count.0
    }

    fn are_all_safe_tiles_open(&self) -> bool {
        self.total_tiles().saturating_sub(self.mine_count) <= self.open_count.0
    }

    fn check_win_condition(&mut self) {
        if self.state.is_finished() {
            return;
        }
        if self.are_all_mines_flagged() && self.are_all_safe_tiles_open() {
            log::debug!("All mines flagged and all safe tiles open, round won");
            self.state = EngineState::Won;
        }
    }
}

impl<G: MineGenerator> Minefield for MinefieldEngine<G> {
    fn set_field_size(&mut self, width: Coord, height: Coord) -> Result<()> {
        if width == 0 {
            return Err(GameError::ZeroDimension { param: "field width" });
        }
        if height == 0 {
            return Err(GameError::ZeroDimension { param: "field height" });
        }
        if self.mine_count != 0 && self.mine_count >= mult(width, height) {
            return Err(GameError::TooManyMines);
        }

        self.width = width;
        self.height = height;
        self.field = Array2::from_elem((usize::from(height), usize::from(width)), Tile::ClosedSafe);
        self.flagged_mine_count = Saturating(0);
        self.flagged_count = Saturating(0);
        self.open_count = Saturating(0);
        self.state = EngineState::Ready;
        log::debug!("Field sized to {}x{}", width, height);
        Ok(())
    }

    fn set_mine_count(&mut self, count: CellCount) -> Result<()> {
        if !self.state.is_ready() {
            log::warn!("Mines already placed this round, keeping {} instead of {}", self.mine_count, count);
            return Ok(());
        }
        if count == 0 {
            return Err(GameError::ZeroMineCount);
        }
        // without a field yet, the next set_field_size checks the budget
        if self.total_tiles() != 0 && count >= self.total_tiles() {
            return Err(GameError::TooManyMines);
        }
        self.mine_count = count;
        Ok(())
    }

    fn set_mines(&mut self, safe: Position) {
        if !self.state.is_ready() {
            log::warn!("Mines already placed this round, ignoring placement around {}", safe);
            return;
        }

        // tiles opened or flagged before placement keep their state
        let mut excluded: HashSet<Position> = self
            .field
            .indexed_iter()
            .filter(|&(_, &tile)| tile != Tile::ClosedSafe)
            .map(|((y, x), _)| Position::new(x as Coord, y as Coord))
            .collect();
        excluded.insert(safe);

        let mines = self
            .generator
            .generate(self.width, self.height, self.mine_count, &excluded);
        for &position in &mines {
            if self.tile_at(position) == Tile::ClosedSafe {
                self.set_tile(position, Tile::ClosedMine);
            }
        }
        self.mine_count = CellCount::try_from(mines.len()).unwrap_or(self.mine_count);
        self.state = EngineState::Active;
        self.check_win_condition();
    }

    fn open_tile(&mut self, position: Position) -> RevealOutcome {
        if self.tile_at(position) == Tile::OpenSafe && !self.state.is_finished() {
            self.chord(position)
        } else {
            self.open_single_tile(position)
        }
    }

    fn flag_toggle_tile(&mut self, position: Position) -> MarkOutcome {
        use Tile::*;

        if self.state.is_finished() {
            return MarkOutcome::NoChange;
        }

        match self.tile_at(position) {
            ClosedMine => {
                self.flagged_mine_count += 1;
                self.flagged_count += 1;
                self.set_tile(position, FlaggedMine);
            }
            FlaggedMine => {
                self.flagged_mine_count -= 1;
                self.flagged_count -= 1;
                self.set_tile(position, ClosedMine);
            }
            ClosedSafe => {
                self.flagged_count += 1;
                self.set_tile(position, FlaggedSafe);
            }
            FlaggedSafe => {
                self.flagged_count -= 1;
                self.set_tile(position, ClosedSafe);
            }
            OpenMine | OpenSafe | OutOfBounds => return MarkOutcome::NoChange,
        }

        self.check_win_condition();
        if self.state.is_finished() {
            MarkOutcome::Won
        } else {
            MarkOutcome::Changed
        }
    }

    fn tile_at(&self, position: Position) -> Tile {
        if position.is_within(self.width, self.height) {
            self.field[position.to_nd_index()]
        } else {
            Tile::OutOfBounds
        }
    }

    fn field(&self) -> ArrayView2<'_, Tile> {
        self.field.view()
    }

    fn count_neighbouring_mines(&self, position: Position) -> u8 {
        if !position.is_within(self.width, self.height) {
            return 0;
        }
        let count = self
            .iter_neighbors(position)
            .filter(|&pos| self.tile_at(pos).is_mine())
            .count();
        // at most 8 neighbours
        count as u8
    }

    fn state(&self) -> EngineState {
        self.state
    }

    fn width(&self) -> Coord {
        self.width
    }

    fn height(&self) -> Coord {
        self.height
    }

    fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }
}
