//! Railway: one track, one direction for the chunk's lifetime
//!
//! Trains come on a fixed cadence. The car/train multipliers change how fast
//! a train moves but never how often one is sent.

use glam::Vec2;

use super::entry_x;
use crate::consts::*;
use crate::error::Result;
use crate::sim::entity::Direction;
use crate::sim::geometry::Rect;
use crate::sim::obstacle::Obstacle;

#[derive(Debug, Clone)]
pub struct RailwayPolicy {
    direction: Direction,
    elapsed_ms: f32,
}

impl RailwayPolicy {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            elapsed_ms: 0.0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Start with an empty track; the first update sends a train
    pub fn init(&mut self) {
        self.elapsed_ms = 0.0;
    }

    pub fn update(
        &mut self,
        bounds: Rect,
        obstacles: &mut Vec<Obstacle>,
        dt_ms: f32,
    ) -> Result<()> {
        self.elapsed_ms += dt_ms;
        let due = obstacles.is_empty() || self.elapsed_ms >= TRAIN_SPAWN_INTERVAL_MS;
        if due && obstacles.len() < RAILWAY_MAX_TRAINS {
            let pos = Vec2::new(entry_x(&bounds, self.direction, TRAIN_LENGTH), bounds.bottom());
            obstacles.push(Obstacle::train(pos, self.direction, TRAIN_SPEED)?);
            self.elapsed_ms = 0.0;
            log::trace!("Train dispatched {:?} at y={}", self.direction, bounds.bottom());
        }
        Ok(())
    }
}
