//! Lane Hopper - simulation core of an endless lane-hopping runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (chunks, obstacles, power-ups, game manager, tick driver)
//! - `settings`: Runtime configuration and difficulty presets
//! - `error`: Error taxonomy shared by constructors, setters and loaders
//!
//! Rendering, menus and save-file I/O live outside this crate; they talk to
//! the core through [`sim::TickHandle`] and [`sim::Snapshot`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
///
/// All distances are in grid cells, speeds in cells per second and
/// durations in milliseconds.
pub mod consts {
    /// Default simulation cadence (ticks per second)
    pub const TICK_RATE_HZ: u32 = 100;

    /// Width of every chunk (and of the playable terrain)
    pub const CHUNK_WIDTH: f32 = 10.0;
    /// Rows kept generated ahead of y = 0
    pub const VIEW_ROWS: f32 = 16.0;
    /// Extra generated rows beyond the visible window
    pub const LOOKAHEAD_ROWS: f32 = 4.0;
    /// Player row above which the terrain scrolls instead of the player
    pub const SCROLL_ROW: f32 = 6.0;

    /// Player start cell
    pub const PLAYER_START_X: f32 = 4.0;
    pub const PLAYER_START_Y: f32 = 1.0;
    /// Height of the opening grass chunk
    pub const START_CHUNK_ROWS: f32 = 3.0;

    /// Grass: obstacle attempts are drawn from 1..GRASS_OBSTACLE_BOUND
    pub const GRASS_OBSTACLE_BOUND: usize = 16;
    /// Grass: at most this many pickables
    pub const GRASS_MAX_PICKABLES: usize = 2;

    /// Road: base spawn interval at car multiplier 1.0
    pub const ROAD_SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const ROAD_MAX_CARS: usize = 8;
    pub const CAR_SPEED_MIN: f32 = 2.0;
    pub const CAR_SPEED_MAX: f32 = 5.0;
    pub const CAR_LENGTH: f32 = 1.5;

    /// Railway: trains spawn on a fixed cadence regardless of multiplier
    pub const TRAIN_SPAWN_INTERVAL_MS: f32 = 5000.0;
    pub const RAILWAY_MAX_TRAINS: usize = 2;
    pub const TRAIN_SPEED: f32 = 18.0;
    pub const TRAIN_LENGTH: f32 = 8.0;

    /// River: logs are spaced LOG_DISTANCE apart at LOG_SPEED
    pub const LOG_SPEED: f32 = 2.0;
    pub const LOG_DISTANCE: f32 = 5.0;
    pub const LOG_LENGTH: f32 = 3.0;
    /// Vertical inset of the water band inside a river chunk
    pub const WATER_INSET: f32 = 0.1;

    /// Power-ups
    pub const POWER_UP_DURATION_MS: f32 = 10_000.0;
    pub const COIN_MULTIPLIER_FACTOR: u32 = 2;
    pub const SLOW_CARS_FACTOR: f32 = 0.5;

    /// Bounded input queue capacity
    pub const INPUT_QUEUE_CAPACITY: usize = 16;
}

/// Spawn interval between two logs, derived from the structural log speed
#[inline]
pub fn log_spawn_interval_ms() -> f32 {
    consts::LOG_DISTANCE / consts::LOG_SPEED * 1000.0
}
