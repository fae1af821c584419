//! Error types for terrain generation and queries

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Bad construction parameters or NaN query input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Query position outside the open unit square
    #[error("Invalid position ({u}, {v}): must lie strictly inside (0, 1) x (0, 1)")]
    InvalidPosition { u: f32, v: f32 },

    /// Heightfield with zero elevation range
    #[error("Degenerate heightfield: every elevation equals {value}")]
    DegenerateHeightfield { value: f32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Background task error: {0}")]
    Background(String),
}
