use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ActionKind, Bindings, CellCount, Coord, GameConfig, GameError, Palette, TileColor, TileContent,
    is_valid_key,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Parse(String),
    #[error("(defaults) {0}")]
    Field(GameError),
    #[error("(bindings.{action}.{index}) \"{key}\" does not match key press pattern")]
    InvalidKey {
        action: ActionKind,
        index: usize,
        key: String,
    },
    #[error("(glyphs) \"{0}\" is not a valid option of tile content")]
    UnknownTileContent(String),
    #[error("(cursor.{half} half) cursor {half} half must be one character")]
    CursorHalfTooLong { half: &'static str },
    #[error("(colors.{content}) {color} does not match ANSI nor HEX RGB")]
    InvalidColor { content: String, color: String },
    #[error("(colors) {0} is not a valid option")]
    UnknownColorTarget(String),
}

/// Every problem found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl core::error::Error for ConfigErrors {}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("your configuration has errors")?;
        for (index, error) in self.0.iter().enumerate() {
            write!(f, "\n{}. {}", index + 1, error)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl Default for Defaults {
    fn default() -> Self {
        let GameConfig {
            width,
            height,
            mines,
        } = GameConfig::default();
        Self {
            width,
            height,
            mines,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorStyle {
    #[serde(rename = "left half")]
    pub left_half: String,
    #[serde(rename = "right half")]
    pub right_half: String,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            left_half: "[".into(),
            right_half: "]".into(),
        }
    }
}

/// User configuration, usually read from `config.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: Defaults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mines: Option<CellCount>,
    /// Keys per action, replacing the default keys of the actions listed.
    pub bindings: BTreeMap<ActionKind, Vec<String>>,
    /// Glyph per tile content name, e.g. `"mine": "*"`.
    pub glyphs: BTreeMap<String, String>,
    pub cursor: CursorStyle,
    /// Colour per tile content name, an ANSI index or `#rrggbb`.
    pub colors: BTreeMap<String, String>,
    /// Use ASCII glyphs instead of the nerd font ones.
    pub ascii: bool,
    /// Paint tile colours as background instead of foreground.
    pub fill: bool,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Parses and validates in one go.
    pub fn load(json: &str) -> Result<Self, ConfigErrors> {
        let config = Self::from_json(json).map_err(|err| ConfigErrors(Vec::from([err])))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = Vec::new();

        if let Err(err) = self.game_config().validate() {
            errors.push(ConfigError::Field(err));
        }

        for (&action, keys) in &self.bindings {
            for (index, key) in keys.iter().enumerate() {
                if !is_valid_key(key) {
                    errors.push(ConfigError::InvalidKey {
                        action,
                        index,
                        key: key.clone(),
                    });
                }
            }
        }

        for name in self.glyphs.keys() {
            if name.parse::<TileContent>().is_err() {
                errors.push(ConfigError::UnknownTileContent(name.clone()));
            }
        }

        for (name, color) in &self.colors {
            if name.parse::<TileContent>().is_err() {
                errors.push(ConfigError::UnknownColorTarget(name.clone()));
            } else if color.parse::<TileColor>().is_err() {
                errors.push(ConfigError::InvalidColor {
                    content: name.clone(),
                    color: color.clone(),
                });
            }
        }

        if self.cursor.left_half.chars().count() > 1 {
            errors.push(ConfigError::CursorHalfTooLong { half: "left" });
        }
        if self.cursor.right_half.chars().count() > 1 {
            errors.push(ConfigError::CursorHalfTooLong { half: "right" });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigErrors(errors))
        }
    }

    /// Field parameters: explicit overrides first, then the defaults.
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(
            self.width.unwrap_or(self.defaults.width),
            self.height.unwrap_or(self.defaults.height),
            self.mines.unwrap_or(self.defaults.mines),
        )
    }

    /// Default bindings with the configured actions rebound.
    pub fn key_bindings(&self) -> Bindings {
        let mut bindings = Bindings::default();
        for (&action, keys) in &self.bindings {
            bindings.unbind_all(action);
            for key in keys {
                bindings.bind(key.clone(), action);
            }
        }
        bindings
    }

    pub fn glyphs(&self) -> Glyphs {
        let mut glyphs = if self.ascii {
            Glyphs::ascii()
        } else {
            Glyphs::nerd_font()
        };
        for (name, glyph) in &self.glyphs {
            if let Ok(content) = name.parse() {
                glyphs.set(content, glyph.clone());
            }
        }
        glyphs
    }

    /// Default palette with the configured colours applied.
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::default();
        for (name, color) in &self.colors {
            if let (Ok(content), Ok(color)) = (name.parse(), color.parse()) {
                palette.set(content, color);
            }
        }
        palette
    }
}

/// Glyph drawn for each [`TileContent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyphs {
    glyphs: BTreeMap<TileContent, String>,
}

impl Glyphs {
    fn with_symbols(mine: &str, flag: &str, wrong_flag: &str) -> Self {
        let mut glyphs = BTreeMap::new();
        glyphs.insert(TileContent::Number(0), "x".to_string());
        for n in 1..=8u8 {
            glyphs.insert(TileContent::Number(n), n.to_string());
        }
        glyphs.insert(TileContent::Mine, mine.into());
        glyphs.insert(TileContent::Flag, flag.into());
        glyphs.insert(TileContent::WrongFlag, wrong_flag.into());
        glyphs.insert(TileContent::Empty, " ".into());
        Self { glyphs }
    }

    pub fn nerd_font() -> Self {
        Self::with_symbols("\u{f0691}", "\u{f023b}", "\u{f18ee}")
    }

    pub fn ascii() -> Self {
        Self::with_symbols("*", "F", "X")
    }

    pub fn set(&mut self, content: TileContent, glyph: String) {
        self.glyphs.insert(content, glyph);
    }

    pub fn get(&self, content: TileContent) -> &str {
        self.glyphs.get(&content).map(String::as_str).unwrap_or("?")
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self::nerd_font()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = Config::load("{}").unwrap();

        assert_eq!(config.game_config(), GameConfig::default());
        assert_eq!(config.key_bindings(), Bindings::default());
        assert_eq!(config.cursor, CursorStyle::default());
    }

    #[test]
    fn overrides_take_precedence_over_defaults() {
        let config = Config::load(
            r#"{
                "defaults": { "width": 10, "height": 8, "mines": 12 },
                "mines": 20
            }"#,
        )
        .unwrap();

        assert_eq!(config.game_config(), GameConfig::new(10, 8, 20));
    }

    #[test]
    fn collects_every_error() {
        let errors = Config::load(
            r#"{
                "mines": 1000,
                "bindings": { "open tile": ["o", "1x"] },
                "glyphs": { "bomb": "B" },
                "cursor": { "left half": "<<", "right half": ">" }
            }"#,
        )
        .unwrap_err();

        assert_eq!(
            errors.0,
            [
                ConfigError::Field(GameError::TooManyMines),
                ConfigError::InvalidKey {
                    action: ActionKind::OpenTile,
                    index: 1,
                    key: "1x".into()
                },
                ConfigError::UnknownTileContent("bomb".into()),
                ConfigError::CursorHalfTooLong { half: "left" },
            ]
        );
    }

    #[test]
    fn unknown_action_fails_to_parse() {
        let errors = Config::load(r#"{ "bindings": { "explode": ["x"] } }"#).unwrap_err();
        assert!(matches!(errors.0.as_slice(), [ConfigError::Parse(_)]));
    }

    #[test]
    fn configured_bindings_replace_defaults_per_action() {
        let config = Config::load(r#"{ "bindings": { "flag tile": ["m", "space"] } }"#).unwrap();
        let bindings = config.key_bindings();

        assert_eq!(bindings.resolve("m"), Ok(crate::Action::once(ActionKind::FlagTile)));
        assert_eq!(bindings.resolve("space"), Ok(crate::Action::once(ActionKind::FlagTile)));
        assert!(bindings.resolve("f").is_err());
        assert_eq!(bindings.resolve("o"), Ok(crate::Action::once(ActionKind::OpenTile)));
    }

    #[test]
    fn glyph_overrides_apply_on_top_of_ascii() {
        let config = Config::load(r#"{ "ascii": true, "glyphs": { "zero": "." } }"#).unwrap();
        let glyphs = config.glyphs();

        assert_eq!(glyphs.get(TileContent::Number(0)), ".");
        assert_eq!(glyphs.get(TileContent::Mine), "*");
        assert_eq!(glyphs.get(TileContent::Number(3)), "3");
    }

    #[test]
    fn colors_are_checked_per_entry() {
        let errors = Config::load(
            r##"{ "colors": { "1": "red", "mine": "#ff0000", "tree": "2" } }"##,
        )
        .unwrap_err();

        assert_eq!(
            errors.0,
            [
                ConfigError::InvalidColor {
                    content: "1".into(),
                    color: "red".into()
                },
                ConfigError::UnknownColorTarget("tree".into()),
            ]
        );
        assert_eq!(
            alloc::format!("{}", errors.0[0]),
            "(colors.1) red does not match ANSI nor HEX RGB"
        );
        assert_eq!(
            alloc::format!("{}", errors.0[1]),
            "(colors) tree is not a valid option"
        );
    }

    #[test]
    fn color_overrides_apply_on_top_of_defaults() {
        let config = Config::load(r##"{ "fill": true, "colors": { "1": "#00f", "flag": "9" } }"##).unwrap();
        let palette = config.palette();

        assert!(config.fill);
        assert_eq!(palette.get(TileContent::Number(1)), Some(TileColor::Rgb { r: 0, g: 0, b: 0xff }));
        assert_eq!(palette.get(TileContent::Flag), Some(TileColor::Ansi(9)));
        assert_eq!(palette.get(TileContent::Number(2)), Some(TileColor::Ansi(10)));
    }

    #[test]
    fn default_config_survives_json() {
        let json = Config::default().to_json().unwrap();
        assert_eq!(Config::load(&json).unwrap(), Config::default());
    }

    #[test]
    fn error_list_is_numbered() {
        let errors = ConfigErrors(Vec::from([
            ConfigError::Field(GameError::ZeroMineCount),
            ConfigError::CursorHalfTooLong { half: "right" },
        ]));

        assert_eq!(
            alloc::format!("{errors}"),
            "your configuration has errors\n\
             1. (defaults) mine count can not be 0\n\
             2. (cursor.right half) cursor right half must be one character"
        );
    }
}
