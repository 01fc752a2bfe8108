//! Session state shared with the presentation layer
//!
//! The player entity, the session phase, and the immutable [`Snapshot`] the
//! simulation publishes after every tick.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Direction, Positionable, Sprite};
use super::geometry::Dimension;
use super::pickable::PowerUpKind;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, `reset` not called yet
    NotStarted,
    Running,
    /// Deadly collision or explicit end
    GameOver,
}

/// The player-controlled entity
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pos: Vec2,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }

    /// Cell the player would land on; x snaps back to the grid first
    pub fn destination(&self, direction: Direction) -> Vec2 {
        Vec2::new(self.pos.x.round(), self.pos.y) + direction.delta()
    }

    pub fn move_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Ride a transport obstacle sideways
    pub fn carry(&mut self, dx: f32) {
        self.pos.x += dx;
    }

    /// Pull x back inside `[min_x, max_x]`
    pub fn clamp_x(&mut self, min_x: f32, max_x: f32) {
        self.pos.x = self.pos.x.clamp(min_x, max_x);
    }
}

impl Positionable for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn dimension(&self) -> Dimension {
        Dimension::CELL
    }

    fn category(&self) -> Category {
        Category::Player
    }

    fn shift_y(&mut self, dy: f32) {
        self.pos.y += dy;
    }
}

/// Read-only copy of everything the renderer and HUD need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub sprites: Vec<Sprite>,
    /// Remaining milliseconds per active power-up
    pub power_ups: BTreeMap<PowerUpKind, f32>,
    pub coins: u64,
    pub score: u64,
    pub game_over: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            phase: GamePhase::NotStarted,
            sprites: Vec::new(),
            power_ups: BTreeMap::new(),
            coins: 0,
            score: 0,
            game_over: false,
        }
    }
}

impl Snapshot {
    /// The player sprite, if the session has one
    pub fn player(&self) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.category == Category::Player)
    }
}
