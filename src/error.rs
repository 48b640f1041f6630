//! Error types for heat map layout and rendering

use thiserror::Error;

/// Result type alias for heat map operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a dataset, computing a layout or rendering it
#[derive(Error, Debug)]
pub enum Error {
    #[error("dataset contains no temperature records")]
    EmptyDataset,

    #[error("record {index}: month {month} is outside 1-12")]
    InvalidMonth { index: usize, month: u32 },

    #[error("record {index}: variance is not a finite number")]
    NonFiniteVariance { index: usize },

    #[error("base temperature is not a finite number")]
    NonFiniteBaseTemperature,

    #[error("bucket count {0} is outside 1-{max}", max = crate::color::MAX_BUCKETS)]
    InvalidBucketCount(usize),

    #[error("palette has {actual} colors, expected {expected}")]
    PaletteLength { expected: usize, actual: usize },

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Deserialization(e.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::Render(e.to_string())
    }
}
