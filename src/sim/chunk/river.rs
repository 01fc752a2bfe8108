//! River: a deadly water band crossed on drifting logs
//!
//! The spawn interval is structural (`LOG_DISTANCE / LOG_SPEED`), so logs stay
//! evenly spaced on screen however the log multiplier changes their speed.

use glam::Vec2;

use super::entry_x;
use crate::consts::*;
use crate::error::Result;
use crate::log_spawn_interval_ms;
use crate::sim::entity::Direction;
use crate::sim::geometry::{Dimension, Rect};
use crate::sim::obstacle::{Obstacle, ObstacleKind};

#[derive(Debug, Clone)]
pub struct RiverPolicy {
    direction: Direction,
    elapsed_ms: f32,
}

impl RiverPolicy {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            elapsed_ms: 0.0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Water band plus one log at the entry edge, inside the chunk
    pub fn init(&mut self, bounds: Rect, obstacles: &mut Vec<Obstacle>) -> Result<()> {
        self.elapsed_ms = 0.0;
        let water_pos = Vec2::new(bounds.left(), bounds.bottom() + WATER_INSET);
        let water_dim =
            Dimension::new(bounds.dim.width(), bounds.dim.height() - 2.0 * WATER_INSET)?;
        obstacles.push(Obstacle::water(water_pos, water_dim)?);

        let x = match self.direction {
            Direction::Left => bounds.right() - LOG_LENGTH,
            _ => bounds.left(),
        };
        let wood = Obstacle::wood_log(Vec2::new(x, bounds.bottom()), self.direction, LOG_SPEED)?;
        obstacles.push(wood);
        Ok(())
    }

    pub fn update(
        &mut self,
        bounds: Rect,
        obstacles: &mut Vec<Obstacle>,
        dt_ms: f32,
    ) -> Result<()> {
        self.elapsed_ms += dt_ms;
        let no_logs = !obstacles.iter().any(|o| o.kind() == ObstacleKind::WoodLog);
        if no_logs || self.elapsed_ms >= log_spawn_interval_ms() {
            let pos = Vec2::new(entry_x(&bounds, self.direction, LOG_LENGTH), bounds.bottom());
            obstacles.push(Obstacle::wood_log(pos, self.direction, LOG_SPEED)?);
            self.elapsed_ms = 0.0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Chunk, Policy};
    use super::*;
    use crate::sim::entity::Positionable;
    use crate::sim::params::SimParams;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn log_count(chunk: &Chunk) -> usize {
        chunk.obstacles().iter().filter(|o| o.kind() == ObstacleKind::WoodLog).count()
    }

    fn river(direction: Direction) -> (Chunk, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(17);
        let dim = Dimension::new(CHUNK_WIDTH, 1.0).unwrap();
        let policy = Policy::River(RiverPolicy::new(direction));
        let mut chunk = Chunk::from_policy(Vec2::ZERO, dim, policy).unwrap();
        chunk.init(&mut rng).unwrap();
        (chunk, rng)
    }

    #[test]
    fn test_init_has_water_and_log() {
        for direction in [Direction::Left, Direction::Right] {
            let (chunk, _) = river(direction);
            assert!(!chunk.obstacles().is_empty());
            assert!(chunk.obstacles().iter().any(|o| o.kind() == ObstacleKind::Water));
            assert_eq!(log_count(&chunk), 1);
        }
    }

    #[test]
    fn test_full_interval_spawns_a_log() {
        for direction in [Direction::Left, Direction::Right] {
            let (mut chunk, mut rng) = river(direction);
            let before = log_count(&chunk);
            chunk.update(&SimParams::new(), log_spawn_interval_ms(), &mut rng).unwrap();
            assert!(log_count(&chunk) > before);
        }
    }

    #[test]
    fn test_short_update_keeps_log_count() {
        let (mut chunk, mut rng) = river(Direction::Right);
        let before = log_count(&chunk);
        chunk.update(&SimParams::new(), log_spawn_interval_ms() / 2.0 - 1.0, &mut rng).unwrap();
        assert_eq!(log_count(&chunk), before);
    }

    #[test]
    fn test_cadence_ignores_log_multiplier() {
        let (mut chunk, mut rng) = river(Direction::Left);
        let mut params = SimParams::new();
        params.set_log_speed_multiplier(3.0).unwrap();
        chunk.update(&params, log_spawn_interval_ms() / 2.0, &mut rng).unwrap();
        assert_eq!(log_count(&chunk), 1);
    }

    #[test]
    fn test_water_is_a_sub_band() {
        let (chunk, _) = river(Direction::Right);
        let water = chunk.obstacles().iter().find(|o| o.kind() == ObstacleKind::Water).unwrap();
        assert!(chunk.rect().contains_rect(&water.rect()));
        assert!(water.dimension().height() < chunk.dimension().height());
    }
}
