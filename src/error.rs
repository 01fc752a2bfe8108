//! Error taxonomy
//!
//! Constructors and setters fail loudly through [`SimError`]. Gameplay rule
//! violations (moving into a rock, spending coins you don't have) are not
//! errors and are reported as `bool` by the game manager.

use thiserror::Error;

use crate::sim::{Direction, ObstacleKind, Terrain};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Dimension must be strictly positive, got {width}x{height}")]
    InvalidDimension { width: f32, height: f32 },

    #[error("{kind:?} speed must be positive, got {speed}")]
    InvalidSpeed { kind: ObstacleKind, speed: f32 },

    #[error("{kind:?} can only move horizontally, got {direction:?}")]
    VerticalDirection {
        kind: ObstacleKind,
        direction: Direction,
    },

    #[error("{0:?} is a passive obstacle and cannot move")]
    NotActive(ObstacleKind),

    #[error("{0:?} is an active obstacle and needs a motion")]
    MissingMotion(ObstacleKind),

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Speed multiplier for {kind:?} must be positive, got {multiplier}")]
    CorruptMultiplier { kind: ObstacleKind, multiplier: f32 },

    #[error("{terrain:?} chunk needs at least {min} rows, got {rows}")]
    ChunkTooSmall {
        terrain: Terrain,
        min: f32,
        rows: f32,
    },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
