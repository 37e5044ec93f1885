use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State of a single tile as stored by the minefield engine.
///
/// Every stored tile is one of the six mine/safe × closed/flagged/open
/// combinations. `OutOfBounds` is only ever returned by queries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    ClosedMine,
    FlaggedMine,
    OpenMine,
    #[default]
    ClosedSafe,
    OpenSafe,
    FlaggedSafe,
    OutOfBounds,
}

impl Tile {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::ClosedMine | Self::FlaggedMine | Self::OpenMine)
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::OpenMine | Self::OpenSafe)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::FlaggedMine | Self::FlaggedSafe)
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::ClosedMine | Self::ClosedSafe)
    }

    pub const fn is_in_bounds(self) -> bool {
        !matches!(self, Self::OutOfBounds)
    }
}

/// What a presentation layer shows for a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileContent {
    /// Number of neighbouring mines, `0..=8`.
    Number(u8),
    Mine,
    Flag,
    WrongFlag,
    Empty,
}

const NUMBER_NAMES: [&str; 9] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight",
];

impl TileContent {
    pub const ALL: [TileContent; 13] = [
        Self::Number(0),
        Self::Number(1),
        Self::Number(2),
        Self::Number(3),
        Self::Number(4),
        Self::Number(5),
        Self::Number(6),
        Self::Number(7),
        Self::Number(8),
        Self::Mine,
        Self::Flag,
        Self::WrongFlag,
        Self::Empty,
    ];

    /// Content shown while the round is still being played; mines stay hidden.
    pub const fn in_play(tile: Tile, neighbouring_mines: u8) -> Self {
        use Tile::*;
        match tile {
            ClosedMine | ClosedSafe | OutOfBounds => Self::Empty,
            FlaggedMine | FlaggedSafe => Self::Flag,
            OpenMine => Self::Mine,
            OpenSafe => Self::Number(neighbouring_mines),
        }
    }

    /// Content shown once the round is over: every mine is visible and flags
    /// on safe tiles are marked as wrong.
    pub const fn revealed(tile: Tile, neighbouring_mines: u8) -> Self {
        use Tile::*;
        match tile {
            ClosedMine | OpenMine => Self::Mine,
            FlaggedMine => Self::Flag,
            FlaggedSafe => Self::WrongFlag,
            ClosedSafe | OpenSafe => Self::Number(neighbouring_mines),
            OutOfBounds => Self::Empty,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Number(n) => NUMBER_NAMES.get(usize::from(n)).copied().unwrap_or("eight"),
            Self::Mine => "mine",
            Self::Flag => "flag",
            Self::WrongFlag => "wrong flag",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for TileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{0}\" is not a valid tile content")]
pub struct ParseTileContentError(pub alloc::string::String);

impl FromStr for TileContent {
    type Err = ParseTileContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = NUMBER_NAMES.iter().position(|&name| name == s) {
            // at most 8, always fits
            return Ok(Self::Number(n as u8));
        }
        if let [digit @ b'0'..=b'8'] = s.as_bytes() {
            return Ok(Self::Number(digit - b'0'));
        }
        match s {
            "mine" => Ok(Self::Mine),
            "flag" => Ok(Self::Flag),
            "wrong flag" => Ok(Self::WrongFlag),
            "empty" => Ok(Self::Empty),
            _ => Err(ParseTileContentError(s.into())),
        }
    }
}
