//! Game manager
//!
//! The single owner of session state: the player, the rolling window of
//! chunks, the simulation parameters and the active power-ups. Everything
//! that mutates the world goes through [`GameManager::update`] or
//! [`GameManager::move_player`], both of which run on one thread.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::chunk::{Chunk, GrassPolicy, Policy};
use super::collision;
use super::entity::{Direction, Positionable, Sprite};
use super::geometry::{Dimension, Rect};
use super::params::SimParams;
use super::pickable::{PowerUp, PowerUpKind};
use super::state::{GamePhase, Player, Snapshot};
use crate::consts::*;
use crate::error::Result;
use crate::settings::Settings;

pub struct GameManager {
    settings: Settings,
    seed: u64,
    phase: GamePhase,
    params: SimParams,
    player: Player,
    /// Ordered bottom to top
    chunks: VecDeque<Chunk>,
    power_ups: BTreeMap<PowerUpKind, PowerUp>,
    rng: Pcg32,
    /// Rows the terrain has scrolled since `reset`
    scrolled_rows: f32,
    /// Furthest absolute row the player has stood on
    furthest_row: f32,
    ticks: u64,
}

impl GameManager {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let params = settings.difficulty.default_params()?;
        Ok(Self {
            settings,
            seed,
            phase: GamePhase::NotStarted,
            params,
            player: Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y)),
            chunks: VecDeque::new(),
            power_ups: BTreeMap::new(),
            rng: Pcg32::seed_from_u64(seed),
            scrolled_rows: 0.0,
            furthest_row: PLAYER_START_Y,
            ticks: 0,
        })
    }

    /// Default settings with a pinned seed
    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::new(Settings {
            seed: Some(seed),
            ..Default::default()
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Direct access for tuning and scripted scenarios; setters still validate
    pub fn params_mut(&mut self) -> &mut SimParams {
        &mut self.params
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Start a fresh run from the session seed; the coin balance carries over
    pub fn reset(&mut self) -> Result<()> {
        let coins = self.params.coin_count();
        self.params = self.settings.difficulty.default_params()?;
        self.params.add_coins(coins);
        self.power_ups.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);

        self.player = Player::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        self.chunks.clear();
        let grass = Policy::Grass(GrassPolicy::new(self.settings.power_up_duration_ms));
        let dim = Dimension::new(CHUNK_WIDTH, START_CHUNK_ROWS)?;
        let mut start = Chunk::from_policy(Vec2::ZERO, dim, grass)?;
        start.init(&mut self.rng)?;
        self.chunks.push_back(start);
        self.fill_window()?;

        self.scrolled_rows = 0.0;
        self.furthest_row = PLAYER_START_Y;
        self.ticks = 0;
        self.phase = GamePhase::Running;
        log::info!("New run (seed {}, {} chunks, {} coins)", self.seed, self.chunks.len(), coins);
        Ok(())
    }

    /// Advance the world by `dt_ms`
    pub fn update(&mut self, dt_ms: f32) -> Result<()> {
        if self.phase != GamePhase::Running {
            return Ok(());
        }
        self.ticks += 1;

        let zone = self.collision_zone();
        // Carry is measured before anything moves, so player and log travel together
        let carry = collision::carry_displacement(
            &self.player.rect(),
            self.chunks.range(zone.clone()),
            dt_ms,
            &self.params,
        )?;

        for chunk in self.chunks.iter_mut() {
            chunk.update(&self.params, dt_ms, &mut self.rng)?;
        }

        if carry != 0.0 {
            self.player.carry(carry);
            self.keep_on_terrain();
        }

        if self.phase == GamePhase::Running {
            let result = collision::resolve(&self.player.rect(), self.chunks.range(zone));
            if let Some(kind) = result.deadly {
                if !self.params.is_invincible() {
                    self.finish(&format!("hit by {:?}", kind));
                }
            }
        }

        self.expire_power_ups(dt_ms)?;
        self.retire_chunks();
        self.fill_window()?;
        Ok(())
    }

    /// Try to hop one cell; `false` when the move is not allowed
    pub fn move_player(&mut self, direction: Direction) -> Result<bool> {
        if self.phase != GamePhase::Running {
            return Ok(false);
        }
        let dest = Rect::cell(self.player.destination(direction));
        let on_terrain = self.terrain().is_some_and(|t| t.contains_rect(&dest));
        if !on_terrain {
            log::trace!("Move {} leaves the terrain", direction.as_str());
            return Ok(false);
        }
        if self.chunks.iter().any(|c| c.is_blocked(&dest)) {
            log::trace!("Move {} blocked", direction.as_str());
            return Ok(false);
        }

        self.player.move_to(dest.pos);
        self.collect_pickables(&dest)?;
        self.advance_rows()?;
        Ok(true)
    }

    /// Terminate the run
    pub fn end_game(&mut self) {
        if self.phase != GamePhase::GameOver {
            self.finish("ended by request");
        }
    }

    /// Replace the simulation parameters from a JSON record; invalid records change nothing
    pub fn load_params(&mut self, json: &str) -> Result<()> {
        self.params.load_json(json)
    }

    /// Copy of every entity inside the visible window, terrain first and the player last
    pub fn positionables(&self) -> Vec<Sprite> {
        let mut sprites = Vec::new();
        for chunk in &self.chunks {
            chunk.collect_sprites(&mut sprites);
        }
        sprites.retain(in_view);
        if self.phase != GamePhase::NotStarted {
            sprites.push(self.player.sprite());
        }
        sprites
    }

    /// Remaining milliseconds of each active power-up
    pub fn active_power_ups(&self) -> BTreeMap<PowerUpKind, f32> {
        self.power_ups
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(kind, p)| (*kind, p.remaining_ms()))
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            phase: self.phase,
            sprites: self.positionables(),
            power_ups: self.active_power_ups(),
            coins: self.params.coin_count(),
            score: self.params.score(),
            game_over: self.is_game_over(),
        }
    }

    fn finish(&mut self, cause: &str) {
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: {} (score {}, coins {})",
            cause,
            self.params.score(),
            self.params.coin_count()
        );
    }

    /// Rectangle spanned by the generated chunks
    fn terrain(&self) -> Option<Rect> {
        let bottom = self.chunks.front()?.rect().bottom();
        let top = self.chunks.back()?.rect().top();
        let dim = Dimension::new(CHUNK_WIDTH, top - bottom).ok()?;
        Some(Rect::new(Vec2::new(0.0, bottom), dim))
    }

    /// Chunks within one of the player's chunk
    fn collision_zone(&self) -> Range<usize> {
        let y = self.player.position().y;
        match self.chunks.iter().position(|c| {
            let r = c.rect();
            r.bottom() <= y && y < r.top()
        }) {
            Some(i) => i.saturating_sub(1)..(i + 2).min(self.chunks.len()),
            None => 0..self.chunks.len(),
        }
    }

    fn keep_on_terrain(&mut self) {
        let x = self.player.position().x;
        if x >= 0.0 && x + 1.0 <= CHUNK_WIDTH {
            return;
        }
        if self.params.is_invincible() {
            self.player.clamp_x(0.0, CHUNK_WIDTH - 1.0);
        } else {
            self.finish("carried off the terrain");
        }
    }

    fn collect_pickables(&mut self, dest: &Rect) -> Result<()> {
        for chunk in self.chunks.iter_mut() {
            for mut coin in chunk.take_coins(dest) {
                coin.pick_up(&mut self.params)?;
            }
            for pickable in chunk.power_ups_at(*dest) {
                let Some(kind) = pickable.as_power_up().map(|p| p.kind()) else {
                    continue;
                };
                if let Some(active) = self.power_ups.get_mut(&kind) {
                    active.refresh();
                    pickable.mark_picked_up();
                    log::debug!("{:?} refreshed", kind);
                    continue;
                }
                pickable.pick_up(&mut self.params)?;
                if let Some(power_up) = pickable.as_power_up() {
                    log::info!("Picked up {:?}", kind);
                    self.power_ups.insert(kind, power_up.clone());
                }
            }
        }
        Ok(())
    }

    fn expire_power_ups(&mut self, dt_ms: f32) -> Result<()> {
        let mut expired = Vec::new();
        for (kind, power_up) in self.power_ups.iter_mut() {
            if power_up.update(dt_ms, &mut self.params)? {
                expired.push(*kind);
            }
        }
        for kind in expired {
            self.power_ups.remove(&kind);
            for chunk in self.chunks.iter_mut() {
                chunk.remove_spent(kind);
            }
            log::info!("{:?} wore off", kind);
        }
        Ok(())
    }

    /// Score new rows and scroll the world once the player passes `SCROLL_ROW`
    fn advance_rows(&mut self) -> Result<()> {
        let y = self.player.position().y;
        let row = y + self.scrolled_rows;
        if row > self.furthest_row {
            self.params.add_score((row - self.furthest_row) as u64);
            self.furthest_row = row;
        }

        let excess = y - SCROLL_ROW;
        if excess > 0.0 {
            self.player.shift_y(-excess);
            for chunk in self.chunks.iter_mut() {
                chunk.shift_y(-excess);
            }
            self.scrolled_rows += excess;
            self.retire_chunks();
            self.fill_window()?;
        }
        Ok(())
    }

    fn retire_chunks(&mut self) {
        while self.chunks.front().is_some_and(|c| c.rect().top() <= 0.0) {
            if let Some(chunk) = self.chunks.pop_front() {
                log::debug!("Retired {:?} chunk", chunk.terrain());
            }
        }
    }

    fn fill_window(&mut self) -> Result<()> {
        let mut next_y = self.chunks.back().map_or(0.0, |c| c.rect().top());
        while next_y < VIEW_ROWS + LOOKAHEAD_ROWS {
            let chunk = Chunk::random(next_y, &mut self.rng, self.settings.power_up_duration_ms)?;
            next_y = chunk.rect().top();
            self.chunks.push_back(chunk);
        }
        Ok(())
    }
}

/// Whether any part of `sprite` falls in rows `[0, VIEW_ROWS)`
fn in_view(sprite: &Sprite) -> bool {
    sprite.position.y < VIEW_ROWS && sprite.position.y + sprite.dimension.height() > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::chunk::{Lane, RiverPolicy, RoadPolicy, Terrain};
    use crate::sim::entity::Category;
    use crate::sim::obstacle::Obstacle;
    use crate::sim::pickable::{Effect, Pickable};

    fn open_field(rows: f32) -> Chunk {
        Chunk::grass(Vec2::ZERO, Dimension::new(CHUNK_WIDTH, rows).unwrap()).unwrap()
    }

    /// Running manager with a hand-built world
    fn scripted(chunks: Vec<Chunk>, player: Vec2) -> GameManager {
        let mut manager = GameManager::with_seed(1).unwrap();
        manager.reset().unwrap();
        manager.chunks = chunks.into();
        manager.player = Player::new(player);
        manager
    }

    fn river_at(y: f32, direction: Direction) -> Chunk {
        let mut rng = Pcg32::seed_from_u64(4);
        let dim = Dimension::new(CHUNK_WIDTH, 1.0).unwrap();
        let policy = Policy::River(RiverPolicy::new(direction));
        let mut chunk = Chunk::from_policy(Vec2::new(0.0, y), dim, policy).unwrap();
        chunk.init(&mut rng).unwrap();
        chunk
    }

    fn grass_at(y: f32, rows: f32) -> Chunk {
        Chunk::grass(Vec2::new(0.0, y), Dimension::new(CHUNK_WIDTH, rows).unwrap()).unwrap()
    }

    #[test]
    fn test_not_started_is_inert() {
        let mut manager = GameManager::with_seed(3).unwrap();
        assert_eq!(manager.phase(), GamePhase::NotStarted);
        manager.update(10.0).unwrap();
        assert_eq!(manager.ticks(), 0);
        assert!(!manager.move_player(Direction::Up).unwrap());
        assert!(manager.positionables().is_empty());
    }

    #[test]
    fn test_reset_builds_window() {
        let mut manager = GameManager::with_seed(3).unwrap();
        manager.reset().unwrap();
        assert_eq!(manager.phase(), GamePhase::Running);
        assert_eq!(manager.player().position(), Vec2::new(PLAYER_START_X, PLAYER_START_Y));

        let chunks: Vec<&Chunk> = manager.chunks().collect();
        assert_eq!(chunks[0].terrain(), Terrain::Grass);
        assert_eq!(chunks[0].position().y, 0.0);
        let top = chunks.last().unwrap().rect().top();
        assert!(top >= VIEW_ROWS + LOOKAHEAD_ROWS);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].rect().top(), pair[1].rect().bottom());
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = GameManager::with_seed(11).unwrap();
        let mut b = GameManager::with_seed(11).unwrap();
        a.reset().unwrap();
        b.reset().unwrap();
        for _ in 0..50 {
            a.update(10.0).unwrap();
            b.update(10.0).unwrap();
        }
        assert_eq!(a.positionables(), b.positionables());
    }

    #[test]
    fn test_solid_obstacle_blocks_move() {
        let mut field = open_field(20.0);
        field.add_obstacle(Obstacle::rock(Vec2::new(4.0, 2.0)).unwrap());
        let mut manager = scripted(vec![field], Vec2::new(4.0, 1.0));

        assert!(!manager.move_player(Direction::Up).unwrap());
        assert_eq!(manager.player().position(), Vec2::new(4.0, 1.0));
        assert!(manager.move_player(Direction::Right).unwrap());
        assert_eq!(manager.player().position(), Vec2::new(5.0, 1.0));
    }

    #[test]
    fn test_terrain_edges_reject_moves() {
        let mut manager = scripted(vec![open_field(20.0)], Vec2::new(0.0, 0.0));
        assert!(!manager.move_player(Direction::Left).unwrap());
        assert!(!manager.move_player(Direction::Down).unwrap());

        manager.player = Player::new(Vec2::new(CHUNK_WIDTH - 1.0, 0.0));
        assert!(!manager.move_player(Direction::Right).unwrap());
        assert!(manager.move_player(Direction::Up).unwrap());
    }

    #[test]
    fn test_coin_pickup_removes_coin() {
        let mut field = open_field(20.0);
        field.add_pickable(Pickable::coin(Vec2::new(4.0, 2.0)));
        let mut manager = scripted(vec![field], Vec2::new(4.0, 1.0));
        let before = manager.params().coin_count();

        assert!(manager.move_player(Direction::Up).unwrap());
        assert_eq!(manager.params().coin_count(), before + 1);
        assert!(manager.chunks().all(|c| c.pickables().is_empty()));
    }

    #[test]
    fn test_power_up_applies_then_expires_once() {
        let mut field = open_field(20.0);
        let pickable =
            Pickable::power_up(Vec2::new(4.0, 2.0), Effect::CoinMultiplier(2), 1000.0).unwrap();
        field.add_pickable(pickable);
        let mut manager = scripted(vec![field], Vec2::new(4.0, 1.0));

        manager.move_player(Direction::Up).unwrap();
        assert_eq!(manager.params().coin_multiplier(), 2);
        assert_eq!(manager.active_power_ups().get(&PowerUpKind::CoinMultiplier), Some(&1000.0));

        manager.update(600.0).unwrap();
        assert_eq!(manager.params().coin_multiplier(), 2);
        manager.update(600.0).unwrap();
        assert_eq!(manager.params().coin_multiplier(), 1);
        assert!(manager.active_power_ups().is_empty());

        manager.update(600.0).unwrap();
        assert_eq!(manager.params().coin_multiplier(), 1);
    }

    #[test]
    fn test_picked_up_power_up_stays_flagged_until_expiry() {
        let mut field = open_field(20.0);
        let duration = 1000.0;
        let pickable =
            Pickable::power_up(Vec2::new(4.0, 2.0), Effect::Invincibility, duration).unwrap();
        field.add_pickable(pickable);
        let mut manager = scripted(vec![field], Vec2::new(4.0, 1.0));

        assert!(manager.move_player(Direction::Up).unwrap());
        assert!(manager.params().is_invincible());
        let flags: Vec<bool> = manager
            .chunks()
            .flat_map(|c| c.pickables().iter().map(|p| p.is_picked_up()))
            .collect();
        assert_eq!(flags, vec![true]);
        let sprites = manager.positionables();
        assert!(!sprites.iter().any(|s| s.category == Category::Invincibility));

        manager.update(duration).unwrap();
        assert!(!manager.params().is_invincible());
        assert!(manager.chunks().all(|c| c.pickables().is_empty()));
    }

    #[test]
    fn test_duplicate_power_up_refreshes() {
        let mut field = open_field(20.0);
        for y in [2.0, 3.0] {
            let pickable =
                Pickable::power_up(Vec2::new(4.0, y), Effect::CoinMultiplier(2), 1000.0).unwrap();
            field.add_pickable(pickable);
        }
        let mut manager = scripted(vec![field], Vec2::new(4.0, 1.0));

        manager.move_player(Direction::Up).unwrap();
        manager.update(700.0).unwrap();
        manager.move_player(Direction::Up).unwrap();
        assert_eq!(manager.params().coin_multiplier(), 2);
        assert_eq!(manager.active_power_ups().get(&PowerUpKind::CoinMultiplier), Some(&1000.0));

        manager.update(1000.0).unwrap();
        assert_eq!(manager.params().coin_multiplier(), 1);
    }

    #[test]
    fn test_car_ends_the_game() {
        let lanes = [
            Lane { row: 0.0, direction: Direction::Right, speed: 1.0 },
            Lane { row: 1.0, direction: Direction::Right, speed: 1.0 },
        ];
        let dim = Dimension::new(CHUNK_WIDTH, 2.0).unwrap();
        let policy = Policy::Road(RoadPolicy::new(lanes));
        let mut road = Chunk::from_policy(Vec2::new(0.0, 1.0), dim, policy).unwrap();
        road.add_obstacle(Obstacle::car(Vec2::new(3.5, 1.0), Direction::Right, 1.0).unwrap());
        let chunks = vec![grass_at(0.0, 1.0), road, grass_at(3.0, 20.0)];
        let mut manager = scripted(chunks, Vec2::new(4.0, 1.0));

        manager.update(10.0).unwrap();
        assert!(manager.is_game_over());
        assert!(manager.snapshot().game_over);
        assert!(!manager.move_player(Direction::Up).unwrap());
    }

    #[test]
    fn test_invincibility_survives_car() {
        let dim = Dimension::new(CHUNK_WIDTH, 2.0).unwrap();
        let lanes = [
            Lane { row: 0.0, direction: Direction::Left, speed: 1.0 },
            Lane { row: 1.0, direction: Direction::Left, speed: 1.0 },
        ];
        let policy = Policy::Road(RoadPolicy::new(lanes));
        let mut road = Chunk::from_policy(Vec2::new(0.0, 1.0), dim, policy).unwrap();
        road.add_obstacle(Obstacle::car(Vec2::new(4.5, 1.0), Direction::Left, 1.0).unwrap());
        let chunks = vec![grass_at(0.0, 1.0), road, grass_at(3.0, 20.0)];
        let mut manager = scripted(chunks, Vec2::new(4.0, 1.0));
        manager.params_mut().set_invincible(true);

        manager.update(10.0).unwrap();
        assert!(!manager.is_game_over());
    }

    #[test]
    fn test_water_without_log_is_deadly() {
        let river = river_at(2.0, Direction::Right);
        let chunks = vec![grass_at(0.0, 2.0), river, grass_at(3.0, 20.0)];
        let mut manager = scripted(chunks, Vec2::new(4.0, 1.0));

        // Initial log covers x in [0, 3); column 6 is open water
        manager.player = Player::new(Vec2::new(6.0, 1.0));
        assert!(manager.move_player(Direction::Up).unwrap());
        manager.update(10.0).unwrap();
        assert!(manager.is_game_over());
    }

    #[test]
    fn test_log_carries_player() {
        let river = river_at(2.0, Direction::Right);
        let chunks = vec![grass_at(0.0, 2.0), river, grass_at(3.0, 20.0)];
        let mut manager = scripted(chunks, Vec2::new(1.0, 1.0));

        assert!(manager.move_player(Direction::Up).unwrap());
        manager.update(500.0).unwrap();
        assert!(!manager.is_game_over());
        let x = manager.player().position().x;
        assert!((x - (1.0 + LOG_SPEED * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_carried_off_terrain() {
        let mut river = river_at(2.0, Direction::Right);
        let wood = Obstacle::wood_log(Vec2::new(8.5, 2.0), Direction::Right, LOG_SPEED).unwrap();
        river.add_obstacle(wood);
        let chunks = vec![grass_at(0.0, 2.0), river, grass_at(3.0, 20.0)];
        let mut manager = scripted(chunks, Vec2::new(9.0, 2.0));

        manager.update(1000.0).unwrap();
        assert!(manager.is_game_over());
    }

    #[test]
    fn test_invincible_rider_is_clamped() {
        let mut river = river_at(2.0, Direction::Right);
        let wood = Obstacle::wood_log(Vec2::new(8.5, 2.0), Direction::Right, LOG_SPEED).unwrap();
        river.add_obstacle(wood);
        let chunks = vec![grass_at(0.0, 2.0), river, grass_at(3.0, 20.0)];
        let mut manager = scripted(chunks, Vec2::new(9.0, 2.0));
        manager.params_mut().set_invincible(true);

        manager.update(1000.0).unwrap();
        assert!(!manager.is_game_over());
        assert_eq!(manager.player().position().x, CHUNK_WIDTH - 1.0);
    }

    #[test]
    fn test_forward_moves_score_and_scroll() {
        let mut manager = scripted(vec![open_field(20.0)], Vec2::new(4.0, 1.0));
        for _ in 0..10 {
            assert!(manager.move_player(Direction::Up).unwrap());
        }
        assert_eq!(manager.params().score(), 10);
        assert_eq!(manager.player().position().y, SCROLL_ROW);
        assert_eq!(manager.chunks().next().unwrap().position().y, -5.0);

        // Going back and forth again scores nothing new
        manager.move_player(Direction::Down).unwrap();
        manager.move_player(Direction::Up).unwrap();
        assert_eq!(manager.params().score(), 10);
    }

    #[test]
    fn test_scrolled_chunks_retire() {
        let chunks = vec![grass_at(0.0, 2.0), grass_at(2.0, 18.0)];
        let mut manager = scripted(chunks, Vec2::new(4.0, 1.0));
        for _ in 0..8 {
            manager.move_player(Direction::Up).unwrap();
        }
        // Three rows scrolled: the two-row chunk dropped below y = 0
        assert_eq!(manager.chunks().next().unwrap().rect().top(), 17.0);
        assert!(manager.chunks().all(|c| c.rect().top() > 0.0));
        assert!(manager.chunks().last().unwrap().rect().top() >= VIEW_ROWS + LOOKAHEAD_ROWS);
    }

    #[test]
    fn test_end_game_and_reset_keep_coins() {
        let mut field = open_field(20.0);
        field.add_pickable(Pickable::coin(Vec2::new(4.0, 2.0)));
        let mut manager = scripted(vec![field], Vec2::new(4.0, 1.0));
        manager.move_player(Direction::Up).unwrap();
        manager.params_mut().set_car_speed_multiplier(3.0).unwrap();

        manager.end_game();
        assert!(manager.is_game_over());

        manager.reset().unwrap();
        assert_eq!(manager.phase(), GamePhase::Running);
        assert_eq!(manager.params().coin_count(), 1);
        assert_eq!(manager.params().score(), 0);
        assert_eq!(manager.params().car_speed_multiplier(), 1.0);
    }

    #[test]
    fn test_positionables_cover_only_the_view() {
        let mut manager = GameManager::with_seed(5).unwrap();
        manager.reset().unwrap();
        let sprites = manager.positionables();
        assert!(sprites.iter().all(in_view));
        let top = sprites.iter().map(|s| s.position.y).fold(f32::MIN, f32::max);
        assert!(top < VIEW_ROWS);

        // The lookahead rows exist but are not handed out
        assert!(manager.chunks().any(|c| c.rect().top() > VIEW_ROWS));
    }

    #[test]
    fn test_reset_replays_the_first_session() {
        let mut replayed = GameManager::with_seed(17).unwrap();
        replayed.reset().unwrap();
        for _ in 0..40 {
            replayed.update(25.0).unwrap();
        }
        replayed.reset().unwrap();

        let mut fresh = GameManager::with_seed(17).unwrap();
        fresh.reset().unwrap();
        assert_eq!(replayed.positionables(), fresh.positionables());
        for _ in 0..30 {
            replayed.update(25.0).unwrap();
            fresh.update(25.0).unwrap();
        }
        assert_eq!(replayed.snapshot(), fresh.snapshot());
    }

    #[test]
    fn test_positionables_is_a_copy() {
        let mut manager = GameManager::with_seed(5).unwrap();
        manager.reset().unwrap();
        let mut sprites = manager.positionables();
        let players = sprites.iter().filter(|s| s.category == Category::Player).count();
        assert_eq!(players, 1);
        assert_eq!(sprites.last().map(|s| s.category), Some(Category::Player));

        sprites.clear();
        assert!(!manager.positionables().is_empty());
    }

    #[test]
    fn test_load_params_rejects_invalid_record() {
        let mut manager = GameManager::with_seed(5).unwrap();
        manager.reset().unwrap();
        let before = manager.params().clone();
        let bad = r#"{
            "coinMultiplier": 0,
            "carSpeedMultiplier": 1.0,
            "trainSpeedMultiplier": 1.0,
            "coinCount": 0,
            "score": 0
        }"#;
        assert!(manager.load_params(bad).is_err());
        assert_eq!(manager.params(), &before);
    }

    #[test]
    fn test_snapshot_tracks_ticks() {
        let mut manager = GameManager::with_seed(8).unwrap();
        manager.reset().unwrap();
        manager.update(10.0).unwrap();
        manager.update(10.0).unwrap();
        let snapshot = manager.snapshot();
        assert_eq!(snapshot.tick, 2);
        assert!(snapshot.player().is_some());
        assert_eq!(snapshot.coins, manager.params().coin_count());
    }
}
