use crate::*;

/// What applying an action did to the round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Ignored,
    Moved,
    Revealed(RevealOutcome),
    Marked(MarkOutcome),
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Moved => true,
            Self::Revealed(outcome) => outcome.has_update(),
            Self::Marked(outcome) => outcome.has_update(),
        }
    }
}

/// One round: a minefield plus the player's cursor.
///
/// Mines are placed on the first open, around the cursor, so the first
/// opened tile is never a mine. Flags are ignored until then.
#[derive(Clone, Debug)]
pub struct Game<M = MinefieldEngine> {
    minefield: M,
    cursor: Cursor,
    moves: u32,
}

impl Game<MinefieldEngine> {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let minefield = MinefieldEngine::from_config(config, RandomMineGenerator::new(seed))?;
        Ok(Self::with_minefield(minefield))
    }
}

impl<M: Minefield> Game<M> {
    pub fn with_minefield(minefield: M) -> Self {
        let cursor = Cursor::centered(minefield.width(), minefield.height());
        Self {
            minefield,
            cursor,
            moves: 0,
        }
    }

    pub fn minefield(&self) -> &M {
        &self.minefield
    }

    pub fn cursor(&self) -> Position {
        self.cursor.position()
    }

    /// Opens and flags made so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn state(&self) -> EngineState {
        self.minefield.state()
    }

    pub fn is_finished(&self) -> bool {
        self.minefield.is_finished()
    }

    /// Applies a resolved action. Movement repeats `quantifier` times, opening
    /// and flagging act once on the tile under the cursor.
    pub fn apply(&mut self, action: Action) -> ActionOutcome {
        if self.minefield.is_finished() {
            return ActionOutcome::Ignored;
        }

        match action.kind {
            ActionKind::OpenTile => {
                let position = self.cursor.position();
                if self.moves == 0 {
                    self.minefield.set_mines(position);
                }
                self.moves += 1;
                let outcome = self.minefield.open_tile(position);
                log::debug!("Open at {}: {:?}", position, outcome);
                ActionOutcome::Revealed(outcome)
            }
            ActionKind::FlagTile => {
                if self.moves == 0 {
                    log::debug!("Ignoring flag before the first open");
                    return ActionOutcome::Ignored;
                }
                self.moves += 1;
                ActionOutcome::Marked(self.minefield.flag_toggle_tile(self.cursor.position()))
            }
            kind => {
                if self.cursor.apply(kind, action.quantifier) {
                    ActionOutcome::Moved
                } else {
                    ActionOutcome::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use ndarray::{Array2, ArrayView2};

    use super::*;

    fn open() -> Action {
        Action::once(ActionKind::OpenTile)
    }

    fn flag() -> Action {
        Action::once(ActionKind::FlagTile)
    }

    /// Records the calls made by the game, every tile reads as open safe.
    #[derive(Default)]
    struct RecordingMinefield {
        placements: Vec<Position>,
        opened: Vec<Position>,
        flagged: Vec<Position>,
        field: Array2<Tile>,
        finished: bool,
    }

    impl RecordingMinefield {
        fn new() -> Self {
            Self {
                field: Array2::from_elem((3, 4), Tile::OpenSafe),
                ..Default::default()
            }
        }
    }

    impl Minefield for RecordingMinefield {
        fn set_field_size(&mut self, width: Coord, height: Coord) -> Result<()> {
            self.field = Array2::from_elem((height.into(), width.into()), Tile::OpenSafe);
            Ok(())
        }

        fn set_mine_count(&mut self, _count: CellCount) -> Result<()> {
            Ok(())
        }

        fn set_mines(&mut self, safe: Position) {
            self.placements.push(safe);
        }

        fn open_tile(&mut self, position: Position) -> RevealOutcome {
            self.opened.push(position);
            RevealOutcome::Revealed
        }

        fn flag_toggle_tile(&mut self, position: Position) -> MarkOutcome {
            self.flagged.push(position);
            MarkOutcome::Changed
        }

        fn tile_at(&self, _position: Position) -> Tile {
            Tile::OpenSafe
        }

        fn field(&self) -> ArrayView2<'_, Tile> {
            self.field.view()
        }

        fn count_neighbouring_mines(&self, _position: Position) -> u8 {
            0
        }

        fn state(&self) -> EngineState {
            if self.finished {
                EngineState::Lost
            } else {
                EngineState::Active
            }
        }

        fn width(&self) -> Coord {
            self.field.dim().1 as Coord
        }

        fn height(&self) -> Coord {
            self.field.dim().0 as Coord
        }

        fn mine_count(&self) -> CellCount {
            1
        }

        fn flagged_count(&self) -> CellCount {
            self.flagged.len() as CellCount
        }
    }

    #[test]
    fn first_open_places_mines_around_cursor_once() {
        let mut game = Game::with_minefield(RecordingMinefield::new());

        game.apply(open());
        game.apply(Action::once(ActionKind::MoveCursorLeft));
        game.apply(open());

        let minefield = game.minefield();
        assert_eq!(minefield.placements, [Position::new(2, 1)]);
        assert_eq!(minefield.opened, [Position::new(2, 1), Position::new(1, 1)]);
        assert_eq!(game.moves(), 2);
    }

    #[test]
    fn flag_before_first_open_is_ignored() {
        let mut game = Game::with_minefield(RecordingMinefield::new());

        assert_eq!(game.apply(flag()), ActionOutcome::Ignored);
        game.apply(open());
        assert_eq!(game.apply(flag()), ActionOutcome::Marked(MarkOutcome::Changed));

        assert_eq!(game.minefield().flagged, [Position::new(2, 1)]);
    }

    #[test]
    fn movement_uses_quantifier() {
        let mut game = Game::with_minefield(RecordingMinefield::new());

        let outcome = game.apply(Action {
            kind: ActionKind::MoveCursorRight,
            quantifier: 5,
        });

        assert_eq!(outcome, ActionOutcome::Moved);
        assert_eq!(game.cursor(), Position::new(3, 1));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn finished_game_ignores_actions() {
        let mut minefield = RecordingMinefield::new();
        minefield.finished = true;
        let mut game = Game::with_minefield(minefield);

        assert_eq!(game.apply(open()), ActionOutcome::Ignored);
        assert!(game.minefield().opened.is_empty());
    }

    #[test]
    fn first_open_is_always_safe() {
        for seed in 0..50 {
            let mut game = Game::new(GameConfig::new(4, 4, 15), seed).unwrap();

            let outcome = game.apply(open());

            assert_eq!(outcome, ActionOutcome::Revealed(RevealOutcome::Revealed));
            assert_eq!(game.minefield().tile_at(game.cursor()), Tile::OpenSafe);
        }
    }

    #[test]
    fn forced_mine_loses_round() {
        let mut game = Game::new(GameConfig::new(3, 3, 8), 11).unwrap();
        game.apply(open());

        game.apply(Action::once(ActionKind::MoveCursorToFirstColumn));
        let outcome = game.apply(open());

        assert_eq!(outcome, ActionOutcome::Revealed(RevealOutcome::HitMine));
        assert_eq!(game.state(), EngineState::Lost);
        assert_eq!(game.minefield().tile_at(Position::new(0, 1)), Tile::OpenMine);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert_eq!(
            Game::new(GameConfig::new(3, 3, 9), 0).err(),
            Some(GameError::TooManyMines)
        );
    }
}
