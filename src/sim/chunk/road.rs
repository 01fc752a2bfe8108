//! Road: two lanes of traffic
//!
//! Cars spawn just outside the chunk on the side they drive in from. The
//! spawn cadence shrinks as the global car multiplier grows, so faster
//! traffic is also denser traffic. Spawns never check for overlap.

use glam::Vec2;
use rand::Rng;

use super::{entry_x, random_direction};
use crate::consts::*;
use crate::error::Result;
use crate::sim::entity::Direction;
use crate::sim::geometry::{Dimension, Rect};
use crate::sim::obstacle::Obstacle;
use crate::sim::params::SimParams;

/// One lane of a road chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    /// Row offset from the chunk's first row
    pub row: f32,
    pub direction: Direction,
    /// Base speed of every car in this lane
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct RoadPolicy {
    lanes: [Lane; 2],
    elapsed_ms: f32,
}

impl RoadPolicy {
    /// Lanes on the first and last row, each with its own random speed and direction
    pub fn random<R: Rng + ?Sized>(dim: Dimension, rng: &mut R) -> Self {
        let rows = [0.0, (dim.height() - 1.0).max(0.0)];
        let lanes = rows.map(|row| Lane {
            row,
            direction: random_direction(rng),
            speed: rng.random_range(CAR_SPEED_MIN..CAR_SPEED_MAX),
        });
        Self::new(lanes)
    }

    pub fn new(lanes: [Lane; 2]) -> Self {
        Self {
            lanes,
            elapsed_ms: 0.0,
        }
    }

    pub fn lanes(&self) -> &[Lane; 2] {
        &self.lanes
    }

    /// One car somewhere inside each lane
    pub fn init<R: Rng + ?Sized>(
        &mut self,
        bounds: Rect,
        obstacles: &mut Vec<Obstacle>,
        rng: &mut R,
    ) -> Result<()> {
        self.elapsed_ms = 0.0;
        for lane in self.lanes {
            let x = bounds.left() + rng.random_range(0.0..bounds.dim.width() - CAR_LENGTH);
            let pos = Vec2::new(x, bounds.bottom() + lane.row);
            obstacles.push(Obstacle::car(pos, lane.direction, lane.speed)?);
        }
        Ok(())
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        bounds: Rect,
        obstacles: &mut Vec<Obstacle>,
        params: &SimParams,
        dt_ms: f32,
        rng: &mut R,
    ) -> Result<()> {
        self.elapsed_ms += dt_ms;
        let interval = ROAD_SPAWN_INTERVAL_MS / params.car_speed_multiplier();
        let due = obstacles.is_empty() || self.elapsed_ms >= interval;
        if due && obstacles.len() < ROAD_MAX_CARS {
            let lane = self.lanes[rng.random_range(0..self.lanes.len())];
            let pos = Vec2::new(
                entry_x(&bounds, lane.direction, CAR_LENGTH),
                bounds.bottom() + lane.row,
            );
            obstacles.push(Obstacle::car(pos, lane.direction, lane.speed)?);
            self.elapsed_ms = 0.0;
        }
        Ok(())
    }
}
