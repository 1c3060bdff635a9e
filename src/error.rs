//! Error types for the simulation, remote sync and configuration layers

use thiserror::Error;

use crate::sim::Point;

/// Errors raised while advancing the simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// Every cell is taken; there is nowhere to put new food.
    #[error("no free cell left for food")]
    NoFreeCell,
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Reasons a remote snake message is rejected. A rejected message leaves
/// the world untouched.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("snake message has no id")]
    MissingId,
    #[error("snake message has no body segments")]
    EmptyBody,
    #[error("segment {index} has zero length")]
    ZeroLengthSegment { index: usize },
    #[error("segment {index} is anchored off the board at {anchor}")]
    SegmentOutOfRange { index: usize, anchor: Point },
    #[error("body of {length} cells exceeds the {max} cells of the board")]
    BodyTooLong { length: u64, max: u64 },
    #[error("unknown direction code {0}")]
    InvalidDirection(u8),
    #[error("malformed message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SimError),
}
