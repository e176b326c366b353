//! Error types for level loading and simulation

use thiserror::Error;

/// A level template that cannot be turned into a grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level width must be positive")]
    ZeroWidth,

    #[error("terrain has {terrain} cells but control has {control}")]
    LengthMismatch { terrain: usize, control: usize },

    #[error("{cells} cells do not fill whole rows of width {width}")]
    NotRectangular { cells: usize, width: usize },

    #[error("unknown terrain symbol {symbol:?} at cell {index}")]
    UnknownSymbol { symbol: char, index: usize },

    #[error("start position ({x}, {y}) lies outside the level")]
    StartOutOfBounds { x: i32, y: i32 },
}

/// Playback read past the end of a sealed recording
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordingError {
    #[error("recording exhausted: no keyframe {keyframe}")]
    Exhausted { keyframe: usize },
}

/// Any failure surfaced by the simulation core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Recording(#[from] RecordingError),
}
