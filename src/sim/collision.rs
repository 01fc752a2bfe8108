//! Per-tick collision resolution
//!
//! Only chunks next to the player's row are checked. DEADLY obstacles are
//! resolved first. SOLID obstacles are enforced when the player moves, so a
//! tick never finds the player inside one. TRANSPORT obstacles are checked
//! last; standing on one also keeps the player out of the water below it.

use super::chunk::Chunk;
use super::entity::{CollisionClass, Positionable};
use super::geometry::Rect;
use super::obstacle::ObstacleKind;
use super::params::SimParams;
use crate::error::Result;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Kind of the first deadly obstacle overlapping the player
    pub deadly: Option<ObstacleKind>,
    /// Player is riding a transport obstacle
    pub transported: bool,
}

impl CollisionResult {
    pub fn clear() -> Self {
        Self {
            deadly: None,
            transported: false,
        }
    }
}

/// Check the player rectangle against every obstacle in `chunks`
pub fn resolve<'a>(player: &Rect, chunks: impl IntoIterator<Item = &'a Chunk>) -> CollisionResult {
    let mut result = CollisionResult::clear();
    for chunk in chunks {
        let supported = chunk.transport_under(player).is_some();
        result.transported |= supported;
        if result.deadly.is_some() {
            continue;
        }
        result.deadly = chunk
            .obstacles()
            .iter()
            .filter(|o| o.collision_class() == CollisionClass::Deadly)
            .filter(|o| !(supported && o.kind() == ObstacleKind::Water))
            .find(|o| o.rect().overlaps(player))
            .map(|o| o.kind());
    }
    result
}

/// Horizontal travel the player inherits this tick from whatever carries it
pub fn carry_displacement<'a>(
    player: &Rect,
    chunks: impl IntoIterator<Item = &'a Chunk>,
    dt_ms: f32,
    params: &SimParams,
) -> Result<f32> {
    for chunk in chunks {
        if let Some(transport) = chunk.transport_under(player) {
            return transport.displacement(dt_ms, params);
        }
    }
    Ok(0.0)
}
