//! Terrain chunks
//!
//! A chunk is a full-width strip of rows that owns its obstacles and
//! pickables. Every kind shares two operations:
//! - `init`: clear and regenerate the contents
//! - `update`: advance moving obstacles, drop the ones that left, then let the
//!   kind's spawn policy decide whether to add more
//!
//! The per-kind policy is a tagged [`Policy`] value; each variant lives in its
//! own module.

pub mod grass;
pub mod railway;
pub mod river;
pub mod road;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Category, CollisionClass, Direction, Positionable, Sprite};
use super::geometry::{Dimension, Rect};
use super::obstacle::Obstacle;
use super::params::SimParams;
use super::pickable::{Pickable, PowerUpKind};
use crate::consts::*;
use crate::error::{Result, SimError};

pub use grass::GrassPolicy;
pub use railway::RailwayPolicy;
pub use river::RiverPolicy;
pub use road::{Lane, RoadPolicy};

/// Terrain types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grass,
    Road,
    River,
    Railway,
}

impl Terrain {
    pub fn category(self) -> Category {
        match self {
            Terrain::Grass => Category::Grass,
            Terrain::Road => Category::Road,
            Terrain::River => Category::River,
            Terrain::Railway => Category::Railway,
        }
    }

    /// Fewest rows a chunk of this kind can have
    pub fn min_rows(self) -> f32 {
        match self {
            Terrain::Road => 2.0,
            Terrain::Grass | Terrain::River | Terrain::Railway => 1.0,
        }
    }

    /// Random terrain with weights grass 40 / road 30 / river 15 / railway 15
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..100) {
            0..40 => Terrain::Grass,
            40..70 => Terrain::Road,
            70..85 => Terrain::River,
            _ => Terrain::Railway,
        }
    }

    /// Random row count for a freshly generated chunk
    pub fn random_rows<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        match self {
            Terrain::Grass => rng.random_range(1..=2) as f32,
            Terrain::Road => rng.random_range(2..=3) as f32,
            Terrain::River | Terrain::Railway => 1.0,
        }
    }
}

/// Generation policy and its running state
#[derive(Debug, Clone)]
pub enum Policy {
    Grass(GrassPolicy),
    Road(RoadPolicy),
    Railway(RailwayPolicy),
    River(RiverPolicy),
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pos: Vec2,
    dim: Dimension,
    obstacles: Vec<Obstacle>,
    pickables: Vec<Pickable>,
    policy: Policy,
}

impl Chunk {
    fn with_policy(pos: Vec2, dim: Dimension, policy: Policy) -> Result<Self> {
        let terrain = match policy {
            Policy::Grass(_) => Terrain::Grass,
            Policy::Road(_) => Terrain::Road,
            Policy::Railway(_) => Terrain::Railway,
            Policy::River(_) => Terrain::River,
        };
        if dim.height() < terrain.min_rows() {
            return Err(SimError::ChunkTooSmall {
                terrain,
                min: terrain.min_rows(),
                rows: dim.height(),
            });
        }
        Ok(Self {
            pos,
            dim,
            obstacles: Vec::new(),
            pickables: Vec::new(),
            policy,
        })
    }

    pub fn grass(pos: Vec2, dim: Dimension) -> Result<Self> {
        Self::with_policy(pos, dim, Policy::Grass(GrassPolicy::new(POWER_UP_DURATION_MS)))
    }

    /// Road with two lanes of independently random speed and direction
    pub fn road<R: Rng + ?Sized>(pos: Vec2, dim: Dimension, rng: &mut R) -> Result<Self> {
        Self::with_policy(pos, dim, Policy::Road(RoadPolicy::random(dim, rng)))
    }

    pub fn railway<R: Rng + ?Sized>(pos: Vec2, dim: Dimension, rng: &mut R) -> Result<Self> {
        Self::with_policy(pos, dim, Policy::Railway(RailwayPolicy::new(random_direction(rng))))
    }

    pub fn river<R: Rng + ?Sized>(pos: Vec2, dim: Dimension, rng: &mut R) -> Result<Self> {
        Self::with_policy(pos, dim, Policy::River(RiverPolicy::new(random_direction(rng))))
    }

    /// Build a chunk from an explicit policy (lets callers pin lane setups)
    pub fn from_policy(pos: Vec2, dim: Dimension, policy: Policy) -> Result<Self> {
        Self::with_policy(pos, dim, policy)
    }

    /// Generate and populate a random full-width chunk whose first row is `y`
    pub fn random<R: Rng + ?Sized>(y: f32, rng: &mut R, power_up_duration_ms: f32) -> Result<Self> {
        let terrain = Terrain::random(rng);
        let rows = terrain.random_rows(rng);
        let pos = Vec2::new(0.0, y);
        let dim = Dimension::new(CHUNK_WIDTH, rows)?;
        let mut chunk = match terrain {
            Terrain::Grass => {
                let policy = Policy::Grass(GrassPolicy::new(power_up_duration_ms));
                Self::with_policy(pos, dim, policy)?
            }
            Terrain::Road => Self::road(pos, dim, rng)?,
            Terrain::Railway => Self::railway(pos, dim, rng)?,
            Terrain::River => Self::river(pos, dim, rng)?,
        };
        chunk.init(rng)?;
        log::debug!("Generated {:?} chunk at y={} ({} rows)", terrain, y, rows);
        Ok(chunk)
    }

    pub fn terrain(&self) -> Terrain {
        match self.policy {
            Policy::Grass(_) => Terrain::Grass,
            Policy::Road(_) => Terrain::Road,
            Policy::Railway(_) => Terrain::Railway,
            Policy::River(_) => Terrain::River,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn pickables(&self) -> &[Pickable] {
        &self.pickables
    }

    /// Place a hand-authored obstacle
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Place a hand-authored pickable
    pub fn add_pickable(&mut self, pickable: Pickable) {
        self.pickables.push(pickable);
    }

    /// Clear and regenerate the contents
    pub fn init<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.obstacles.clear();
        self.pickables.clear();
        let bounds = self.rect();
        match &mut self.policy {
            Policy::Grass(p) => p.init(bounds, &mut self.obstacles, &mut self.pickables, rng),
            Policy::Road(p) => p.init(bounds, &mut self.obstacles, rng),
            Policy::Railway(p) => {
                p.init();
                Ok(())
            }
            Policy::River(p) => p.init(bounds, &mut self.obstacles),
        }
    }

    /// Advance one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        params: &SimParams,
        dt_ms: f32,
        rng: &mut R,
    ) -> Result<()> {
        if matches!(self.policy, Policy::Grass(_)) {
            return Ok(());
        }
        for obstacle in &mut self.obstacles {
            obstacle.update(dt_ms, params)?;
        }
        let bounds = self.rect();
        self.obstacles.retain(|o| !o.has_left(&bounds));

        match &mut self.policy {
            Policy::Grass(_) => Ok(()),
            Policy::Road(p) => p.update(bounds, &mut self.obstacles, params, dt_ms, rng),
            Policy::Railway(p) => p.update(bounds, &mut self.obstacles, dt_ms),
            Policy::River(p) => p.update(bounds, &mut self.obstacles, dt_ms),
        }
    }

    /// A SOLID obstacle overlaps `rect`
    pub fn is_blocked(&self, rect: &Rect) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.collision_class() == CollisionClass::Solid && o.rect().overlaps(rect))
    }

    /// First TRANSPORT obstacle under `rect`
    pub fn transport_under(&self, rect: &Rect) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|o| o.collision_class() == CollisionClass::Transport && o.rect().overlaps(rect))
    }

    /// Remove and return every coin overlapping `rect`
    pub fn take_coins(&mut self, rect: &Rect) -> Vec<Pickable> {
        let (taken, kept): (Vec<Pickable>, Vec<Pickable>) = std::mem::take(&mut self.pickables)
            .into_iter()
            .partition(|p| p.is_coin() && !p.is_picked_up() && p.rect().overlaps(rect));
        self.pickables = kept;
        taken
    }

    /// Uncollected power-ups overlapping `rect`; they stay in the chunk once picked up
    pub fn power_ups_at(&mut self, rect: Rect) -> impl Iterator<Item = &mut Pickable> {
        self.pickables
            .iter_mut()
            .filter(move |p| !p.is_coin() && !p.is_picked_up() && p.rect().overlaps(&rect))
    }

    /// Drop picked-up power-ups of `kind` whose effect has run out
    pub fn remove_spent(&mut self, kind: PowerUpKind) {
        self.pickables.retain(|p| {
            let spent = p.is_picked_up() && p.as_power_up().is_some_and(|u| u.kind() == kind);
            !spent
        });
    }

    /// Terrain, obstacle and pickable sprites in draw order
    pub fn collect_sprites(&self, out: &mut Vec<Sprite>) {
        out.push(self.sprite());
        out.extend(self.obstacles.iter().map(|o| o.sprite()));
        out.extend(self.pickables.iter().filter(|p| !p.is_picked_up()).map(|p| p.sprite()));
    }
}

impl Positionable for Chunk {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn dimension(&self) -> Dimension {
        self.dim
    }

    fn category(&self) -> Category {
        self.terrain().category()
    }

    fn shift_y(&mut self, dy: f32) {
        self.pos.y += dy;
        for obstacle in &mut self.obstacles {
            obstacle.shift_y(dy);
        }
        for pickable in &mut self.pickables {
            pickable.shift_y(dy);
        }
    }
}

pub(crate) fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    if rng.random_bool(0.5) { Direction::Left } else { Direction::Right }
}

/// X coordinate just outside `bounds` on the side a mover enters from
pub(crate) fn entry_x(bounds: &Rect, direction: Direction, length: f32) -> f32 {
    match direction {
        Direction::Left => bounds.right(),
        _ => bounds.left() - length,
    }
}
