//! Obstacles
//!
//! One struct for every obstacle kind, tagged by [`ObstacleKind`]. Behavior
//! that differs per kind (collision class, which multiplier drives it) is a
//! `match` on the tag. Active kinds (car, train, log) carry a [`Motion`];
//! passive kinds (rock, tree, water) never move.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, CollisionClass, Direction, Positionable};
use super::geometry::{Dimension, Rect};
use super::params::SimParams;
use crate::consts::*;
use crate::error::{Result, SimError};

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Car,
    Train,
    WoodLog,
    Rock,
    Tree,
    Water,
}

impl ObstacleKind {
    pub fn collision_class(self) -> CollisionClass {
        match self {
            ObstacleKind::Car | ObstacleKind::Train | ObstacleKind::Water => CollisionClass::Deadly,
            ObstacleKind::Rock | ObstacleKind::Tree => CollisionClass::Solid,
            ObstacleKind::WoodLog => CollisionClass::Transport,
        }
    }

    /// Kinds that move laterally every tick
    pub fn is_active(self) -> bool {
        matches!(self, ObstacleKind::Car | ObstacleKind::Train | ObstacleKind::WoodLog)
    }

    pub fn category(self) -> Category {
        match self {
            ObstacleKind::Car => Category::Car,
            ObstacleKind::Train => Category::Train,
            ObstacleKind::WoodLog => Category::WoodLog,
            ObstacleKind::Rock => Category::Rock,
            ObstacleKind::Tree => Category::Tree,
            ObstacleKind::Water => Category::Water,
        }
    }

    /// Global multiplier applied to this kind's base speed
    pub fn speed_multiplier(self, params: &SimParams) -> f32 {
        match self {
            ObstacleKind::Car => params.car_speed_multiplier(),
            ObstacleKind::Train => params.train_speed_multiplier(),
            ObstacleKind::WoodLog => params.log_speed_multiplier(),
            ObstacleKind::Rock | ObstacleKind::Tree | ObstacleKind::Water => 1.0,
        }
    }
}

/// Lateral motion of an active obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    direction: Direction,
    /// Base speed in cells per second
    speed: f32,
}

impl Motion {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// +1 rightward, -1 leftward
    fn sign(&self) -> f32 {
        if self.direction == Direction::Right { 1.0 } else { -1.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    kind: ObstacleKind,
    pos: Vec2,
    dim: Dimension,
    motion: Option<Motion>,
}

/// Two obstacles of the same kind on the same rectangle are the same entity
impl PartialEq for Obstacle {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.pos == other.pos && self.dim == other.dim
    }
}

impl Obstacle {
    /// A stationary obstacle (rock, tree, water)
    pub fn passive(kind: ObstacleKind, pos: Vec2, dim: Dimension) -> Result<Self> {
        if kind.is_active() {
            return Err(SimError::MissingMotion(kind));
        }
        Ok(Self {
            kind,
            pos,
            dim,
            motion: None,
        })
    }

    /// A moving obstacle; only horizontal directions and positive speeds are valid
    pub fn active(
        kind: ObstacleKind,
        pos: Vec2,
        dim: Dimension,
        direction: Direction,
        speed: f32,
    ) -> Result<Self> {
        if !kind.is_active() {
            return Err(SimError::NotActive(kind));
        }
        if !direction.is_horizontal() {
            return Err(SimError::VerticalDirection { kind, direction });
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SimError::InvalidSpeed { kind, speed });
        }
        Ok(Self {
            kind,
            pos,
            dim,
            motion: Some(Motion { direction, speed }),
        })
    }

    pub fn car(pos: Vec2, direction: Direction, speed: f32) -> Result<Self> {
        Self::active(ObstacleKind::Car, pos, Dimension::new(CAR_LENGTH, 1.0)?, direction, speed)
    }

    pub fn train(pos: Vec2, direction: Direction, speed: f32) -> Result<Self> {
        Self::active(ObstacleKind::Train, pos, Dimension::new(TRAIN_LENGTH, 1.0)?, direction, speed)
    }

    pub fn wood_log(pos: Vec2, direction: Direction, speed: f32) -> Result<Self> {
        Self::active(ObstacleKind::WoodLog, pos, Dimension::new(LOG_LENGTH, 1.0)?, direction, speed)
    }

    pub fn rock(pos: Vec2) -> Result<Self> {
        Self::passive(ObstacleKind::Rock, pos, Dimension::CELL)
    }

    pub fn tree(pos: Vec2) -> Result<Self> {
        Self::passive(ObstacleKind::Tree, pos, Dimension::CELL)
    }

    pub fn water(pos: Vec2, dim: Dimension) -> Result<Self> {
        Self::passive(ObstacleKind::Water, pos, dim)
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    pub fn collision_class(&self) -> CollisionClass {
        self.kind.collision_class()
    }

    /// Horizontal travel over `dt_ms` milliseconds under `params`
    ///
    /// Fails if the resolved multiplier is not positive: that can only
    /// happen when the parameter record itself is corrupt.
    pub fn displacement(&self, dt_ms: f32, params: &SimParams) -> Result<f32> {
        let Some(motion) = self.motion else {
            return Ok(0.0);
        };
        let multiplier = self.kind.speed_multiplier(params);
        if multiplier.is_nan() || multiplier <= 0.0 {
            return Err(SimError::CorruptMultiplier {
                kind: self.kind,
                multiplier,
            });
        }
        Ok(motion.sign() * motion.speed * multiplier * dt_ms / 1000.0)
    }

    /// Advance one tick
    pub fn update(&mut self, dt_ms: f32, params: &SimParams) -> Result<()> {
        self.pos.x += self.displacement(dt_ms, params)?;
        Ok(())
    }

    /// True once a moving obstacle has fully left `bounds` on its exit side
    pub fn has_left(&self, bounds: &Rect) -> bool {
        let rect = self.rect();
        match self.motion.map(|m| m.direction) {
            Some(Direction::Right) => rect.left() >= bounds.right(),
            Some(Direction::Left) => rect.right() <= bounds.left(),
            _ => false,
        }
    }
}

impl Positionable for Obstacle {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn dimension(&self) -> Dimension {
        self.dim
    }

    fn category(&self) -> Category {
        self.kind.category()
    }

    fn shift_y(&mut self, dy: f32) {
        self.pos.y += dy;
    }
}
