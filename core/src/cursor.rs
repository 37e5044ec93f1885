use crate::*;

/// Tile the player is pointing at, always kept inside the field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    position: Position,
    width: Coord,
    height: Coord,
}

impl Cursor {
    /// Cursor in the middle of a `width × height` field.
    pub fn centered(width: Coord, height: Coord) -> Self {
        Self {
            position: Position::new(width / 2, height / 2),
            width,
            height,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    fn last_column(&self) -> Coord {
        self.width.saturating_sub(1)
    }

    fn last_row(&self) -> Coord {
        self.height.saturating_sub(1)
    }

    /// Applies a movement action `steps` times, stopping at the edges.
    ///
    /// Returns whether the cursor moved. Non-movement actions are ignored.
    pub fn apply(&mut self, kind: ActionKind, steps: u16) -> bool {
        use ActionKind::*;

        let Position { x, y } = self.position;
        let next = match kind {
            MoveCursorUp => Position::new(x, y.saturating_sub(steps)),
            MoveCursorDown => Position::new(x, y.saturating_add(steps).min(self.last_row())),
            MoveCursorLeft => Position::new(x.saturating_sub(steps), y),
            MoveCursorRight => Position::new(x.saturating_add(steps).min(self.last_column()), y),
            MoveCursorToTopRow => Position::new(x, 0),
            MoveCursorToBottomRow => Position::new(x, self.last_row()),
            MoveCursorToFirstColumn => Position::new(0, y),
            MoveCursorToLastColumn => Position::new(self.last_column(), y),
            OpenTile | FlagTile => return false,
        };

        let moved = next != self.position;
        self.position = next;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered() {
        assert_eq!(Cursor::centered(9, 4).position(), Position::new(4, 2));
        assert_eq!(Cursor::centered(1, 1).position(), Position::new(0, 0));
    }

    #[test]
    fn moves_stop_at_edges() {
        let mut cursor = Cursor::centered(5, 5);

        assert!(cursor.apply(ActionKind::MoveCursorUp, 10));
        assert_eq!(cursor.position(), Position::new(2, 0));
        assert!(!cursor.apply(ActionKind::MoveCursorUp, 1));

        cursor.apply(ActionKind::MoveCursorRight, u16::MAX);
        assert_eq!(cursor.position(), Position::new(4, 0));

        cursor.apply(ActionKind::MoveCursorDown, 3);
        cursor.apply(ActionKind::MoveCursorLeft, 1);
        assert_eq!(cursor.position(), Position::new(3, 3));
    }

    #[test]
    fn jumps_to_rows_and_columns() {
        let mut cursor = Cursor::centered(6, 3);

        cursor.apply(ActionKind::MoveCursorToBottomRow, 1);
        cursor.apply(ActionKind::MoveCursorToLastColumn, 1);
        assert_eq!(cursor.position(), Position::new(5, 2));

        cursor.apply(ActionKind::MoveCursorToTopRow, 1);
        cursor.apply(ActionKind::MoveCursorToFirstColumn, 1);
        assert_eq!(cursor.position(), Position::new(0, 0));
    }

    #[test]
    fn ignores_tile_actions() {
        let mut cursor = Cursor::centered(3, 3);
        assert!(!cursor.apply(ActionKind::OpenTile, 4));
        assert_eq!(cursor.position(), Position::new(1, 1));
    }
}
