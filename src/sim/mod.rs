//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Δt-driven updates only; the tick driver owns wall-clock time
//! - Seeded RNG only, threaded explicitly into generation
//! - Chunks ordered bottom to top, obstacles in spawn order
//! - No rendering or platform dependencies

pub mod chunk;
pub mod collision;
pub mod entity;
pub mod geometry;
pub mod manager;
pub mod obstacle;
pub mod params;
pub mod pickable;
pub mod state;
pub mod tick;

pub use chunk::{Chunk, GrassPolicy, Lane, Policy, RailwayPolicy, RiverPolicy, RoadPolicy, Terrain};
pub use collision::{CollisionResult, carry_displacement, resolve};
pub use entity::{Category, CollisionClass, Direction, Positionable, Sprite};
pub use geometry::{Dimension, Rect};
pub use manager::GameManager;
pub use obstacle::{Motion, Obstacle, ObstacleKind};
pub use params::SimParams;
pub use pickable::{Effect, Pickable, PowerUp, PowerUpKind};
pub use state::{GamePhase, Player, Snapshot};
pub use tick::{TickDriver, TickHandle, TickOutcome, channel};
