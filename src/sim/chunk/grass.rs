//! Grass: static scenery
//!
//! Trees and rocks are scattered once at `init` and never regenerate. Each
//! placement is tried once; a cell that is already taken is skipped, not
//! retried, so dense draws simply produce fewer obstacles.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::error::Result;
use crate::sim::entity::Positionable;
use crate::sim::geometry::Rect;
use crate::sim::obstacle::Obstacle;
use crate::sim::pickable::{Pickable, PowerUpKind};

#[derive(Debug, Clone)]
pub struct GrassPolicy {
    power_up_duration_ms: f32,
}

impl GrassPolicy {
    pub fn new(power_up_duration_ms: f32) -> Self {
        Self {
            power_up_duration_ms,
        }
    }

    pub fn init<R: Rng + ?Sized>(
        &mut self,
        bounds: Rect,
        obstacles: &mut Vec<Obstacle>,
        pickables: &mut Vec<Pickable>,
        rng: &mut R,
    ) -> Result<()> {
        let cells = free_cells(&bounds);
        if cells.is_empty() {
            return Ok(());
        }

        let attempts = rng.random_range(1..GRASS_OBSTACLE_BOUND);
        for _ in 0..attempts {
            let cell = cells[rng.random_range(0..cells.len())];
            if is_occupied(cell, obstacles, pickables) {
                continue;
            }
            let obstacle = if rng.random_bool(0.7) {
                Obstacle::tree(cell)?
            } else {
                Obstacle::rock(cell)?
            };
            obstacles.push(obstacle);
        }

        let pickable_count = rng.random_range(0..=GRASS_MAX_PICKABLES);
        for _ in 0..pickable_count {
            let cell = cells[rng.random_range(0..cells.len())];
            if is_occupied(cell, obstacles, pickables) {
                continue;
            }
            pickables.push(self.random_pickable(cell, rng)?);
        }
        Ok(())
    }

    /// Coins are common; each power-up kind is a 10% draw
    fn random_pickable<R: Rng + ?Sized>(&self, cell: Vec2, rng: &mut R) -> Result<Pickable> {
        let kind = match rng.random_range(0..10) {
            0 => PowerUpKind::CoinMultiplier,
            1 => PowerUpKind::Invincibility,
            2 => PowerUpKind::SlowCars,
            _ => return Ok(Pickable::coin(cell)),
        };
        Pickable::power_up(cell, kind.default_effect(), self.power_up_duration_ms)
    }
}

/// Every cell of the chunk except the player start cell
fn free_cells(bounds: &Rect) -> Vec<Vec2> {
    let start = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
    let cols = bounds.dim.width().floor() as usize;
    let rows = bounds.dim.height().floor() as usize;
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| bounds.pos + Vec2::new(col as f32, row as f32)))
        .filter(|cell| *cell != start)
        .collect()
}

fn is_occupied(cell: Vec2, obstacles: &[Obstacle], pickables: &[Pickable]) -> bool {
    let rect = Rect::cell(cell);
    obstacles.iter().any(|o| o.rect().overlaps(&rect))
        || pickables.iter().any(|p| p.rect().overlaps(&rect))
}
