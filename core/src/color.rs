use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::TileContent;

/// A terminal colour, either an entry of the 256 colour ANSI table or a
/// true colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileColor {
    Ansi(u8),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} does not match ANSI nor HEX RGB")]
pub struct ParseColorError(pub String);

impl FromStr for TileColor {
    type Err = ParseColorError;

    /// Accepts `0`..`255` without leading zeros, `#rgb` and `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.into());

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.into(),
                _ => return Err(err()),
            };
            let channel = |at: usize| u8::from_str_radix(&expanded[at..at + 2], 16).map_err(|_| err());
            return Ok(Self::Rgb {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
            });
        }

        let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits_only || (s.len() > 1 && s.starts_with('0')) {
            return Err(err());
        }
        s.parse().map(Self::Ansi).map_err(|_| err())
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Ansi(index) => write!(f, "{index}"),
            Self::Rgb { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// Colour each [`TileContent`] is drawn in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: BTreeMap<TileContent, TileColor>,
}

impl Palette {
    pub fn set(&mut self, content: TileContent, color: TileColor) {
        self.colors.insert(content, color);
    }

    pub fn get(&self, content: TileContent) -> Option<TileColor> {
        self.colors.get(&content).copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        const NUMBERS: [u8; 9] = [8, 12, 10, 3, 9, 13, 5, 1, 14];

        let mut colors = BTreeMap::new();
        for (n, &index) in (0u8..).zip(NUMBERS.iter()) {
            colors.insert(TileContent::Number(n), TileColor::Ansi(index));
        }
        for content in [
            TileContent::Mine,
            TileContent::Flag,
            TileContent::WrongFlag,
            TileContent::Empty,
        ] {
            colors.insert(content, TileColor::Ansi(15));
        }
        Self { colors }
    }
}
