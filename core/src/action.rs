use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest quantifier accepted, `u16::MAX` has five digits.
const MAX_QUANTIFIER_DIGITS: usize = 5;

const NAMED_KEYS: [&str; 12] = [
    "enter",
    "space",
    "tab",
    "backspace",
    "delete",
    "pgup",
    "pgdn",
    "up",
    "down",
    "left",
    "right",
    "esc",
];

const MODIFIERS: [&str; 3] = ["alt+", "ctrl+", "shift+"];

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "move cursor up")]
    MoveCursorUp,
    #[serde(rename = "move cursor down")]
    MoveCursorDown,
    #[serde(rename = "move cursor left")]
    MoveCursorLeft,
    #[serde(rename = "move cursor right")]
    MoveCursorRight,
    #[serde(rename = "open tile")]
    OpenTile,
    #[serde(rename = "flag tile")]
    FlagTile,
    #[serde(rename = "move cursor to top row")]
    MoveCursorToTopRow,
    #[serde(rename = "move cursor to bottom row")]
    MoveCursorToBottomRow,
    #[serde(rename = "move cursor to first column")]
    MoveCursorToFirstColumn,
    #[serde(rename = "move cursor to last column")]
    MoveCursorToLastColumn,
}

impl ActionKind {
    pub const fn is_movement(self) -> bool {
        !matches!(self, Self::OpenTile | Self::FlagTile)
    }

    pub fn name(self) -> &'static str {
        use ActionKind::*;
        match self {
            MoveCursorUp => "move cursor up",
            MoveCursorDown => "move cursor down",
            MoveCursorLeft => "move cursor left",
            MoveCursorRight => "move cursor right",
            OpenTile => "open tile",
            FlagTile => "flag tile",
            MoveCursorToTopRow => "move cursor to top row",
            MoveCursorToBottomRow => "move cursor to bottom row",
            MoveCursorToFirstColumn => "move cursor to first column",
            MoveCursorToLastColumn => "move cursor to last column",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved command, repeated `quantifier` times.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub quantifier: u16,
}

impl Action {
    pub const fn once(kind: ActionKind) -> Self {
        Self { kind, quantifier: 1 }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("no matching action for bind \"{bind}\"")]
    InvalidBind { bind: String },
    #[error("could not parse quantifier \"{quantifier}\"")]
    Quantifier { quantifier: String },
}

/// Whether `key` is a well formed key press: optional `alt+`, `ctrl+`, `shift+`
/// modifiers in that order, then a named key or word characters.
///
/// Keys may not start with a digit, digits are read as a quantifier.
pub fn is_valid_key(key: &str) -> bool {
    let mut rest = key;
    for modifier in MODIFIERS {
        if let Some(stripped) = rest.strip_prefix(modifier) {
            rest = stripped;
        }
    }

    if rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    NAMED_KEYS.contains(&rest)
        || rest
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '\\' | '~' | '$' | '#' | '@' | '^'))
}

/// Splits keystrokes into the leading quantifier digits and the key part.
fn split_quantifier(keystrokes: &str) -> (&str, &str) {
    let digits = keystrokes
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(keystrokes.len());
    keystrokes.split_at(digits)
}

fn parse_quantifier(quantifier: &str) -> Result<u16, ActionError> {
    if quantifier.is_empty() {
        return Ok(1);
    }
    let error = || ActionError::Quantifier {
        quantifier: quantifier.into(),
    };
    if quantifier.len() > MAX_QUANTIFIER_DIGITS {
        return Err(error());
    }
    match quantifier.parse::<u16>() {
        Ok(0) | Err(_) => Err(error()),
        Ok(n) => Ok(n),
    }
}

/// Maps key sequences to the action they trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bindings {
    keys: BTreeMap<String, ActionKind>,
}

impl Bindings {
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Binds `key` to `kind`, replacing whatever it was bound to before.
    pub fn bind(&mut self, key: impl Into<String>, kind: ActionKind) {
        self.keys.insert(key.into(), kind);
    }

    /// Removes every key bound to `kind`.
    pub fn unbind_all(&mut self, kind: ActionKind) {
        self.keys.retain(|_, bound| *bound != kind);
    }

    pub fn keys_for(&self, kind: ActionKind) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|&(_, &bound)| bound == kind)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Resolves a full keystroke sequence such as `"12j"` into an action.
    pub fn resolve(&self, keystrokes: &str) -> Result<Action, ActionError> {
        if let Some(&kind) = self.keys.get(keystrokes) {
            return Ok(Action::once(kind));
        }

        let (quantifier, key) = split_quantifier(keystrokes);
        let Some(&kind) = self.keys.get(key) else {
            return Err(ActionError::InvalidBind {
                bind: key.to_string(),
            });
        };

        Ok(Action {
            kind,
            quantifier: parse_quantifier(quantifier)?,
        })
    }

    /// Whether more keystrokes could still complete `keystrokes` into a binding.
    pub fn is_prefix(&self, keystrokes: &str) -> bool {
        let (quantifier, key) = split_quantifier(keystrokes);
        if quantifier.len() > MAX_QUANTIFIER_DIGITS {
            return false;
        }
        if key.is_empty() {
            return true;
        }
        self.keys.keys().any(|bound| bound.starts_with(key))
    }
}

impl Default for Bindings {
    fn default() -> Self {
        use ActionKind::*;

        let mut bindings = Self::empty();
        for (key, kind) in [
            ("k", MoveCursorUp),
            ("up", MoveCursorUp),
            ("j", MoveCursorDown),
            ("down", MoveCursorDown),
            ("h", MoveCursorLeft),
            ("left", MoveCursorLeft),
            ("l", MoveCursorRight),
            ("right", MoveCursorRight),
            ("o", OpenTile),
            ("space", OpenTile),
            ("enter", OpenTile),
            ("f", FlagTile),
            ("gg", MoveCursorToTopRow),
            ("G", MoveCursorToBottomRow),
            ("^", MoveCursorToFirstColumn),
            ("$", MoveCursorToLastColumn),
        ] {
            bindings.bind(key, kind);
        }
        bindings
    }
}
