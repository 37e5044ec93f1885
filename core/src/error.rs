use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{param} can not be 0")]
    ZeroDimension { param: &'static str },
    #[error("mine count can not be 0")]
    ZeroMineCount,
    #[error("mine count must be less than field width multiplied by field height")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;
