//! Shared entity capabilities
//!
//! Every simulated object (terrain chunk, obstacle, pickable, player) is a
//! [`Positionable`]: it has a rectangle, a category tag for the renderer, and
//! can be shifted vertically when the terrain scrolls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Dimension, Rect};

/// Closed set of entity tags understood by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    // Terrain
    Grass,
    Road,
    River,
    Railway,
    // Obstacles
    Car,
    Train,
    Rock,
    Tree,
    WoodLog,
    Water,
    // Pickables
    Coin,
    CoinMultiplier,
    Invincibility,
    SlowCars,
    Player,
}

/// How the player interacts with an obstacle on overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionClass {
    /// Ends the game unless invincible
    Deadly,
    /// Blocks movement into the cell
    Solid,
    /// Carries the player horizontally
    Transport,
}

/// Discrete movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Forward, toward higher rows
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// One-cell displacement
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Opposite direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            "left" | "a" => Some(Direction::Left),
            "right" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Base capability of all simulated objects
pub trait Positionable {
    fn position(&self) -> Vec2;
    fn dimension(&self) -> Dimension;
    fn category(&self) -> Category;
    /// Translate along y (terrain scrolling)
    fn shift_y(&mut self, dy: f32);

    fn rect(&self) -> Rect {
        Rect::new(self.position(), self.dimension())
    }

    /// Copy of everything the renderer needs
    fn sprite(&self) -> Sprite {
        Sprite {
            category: self.category(),
            position: self.position(),
            dimension: self.dimension(),
        }
    }
}

/// Immutable render record for one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub category: Category,
    pub position: Vec2,
    pub dimension: Dimension,
}
