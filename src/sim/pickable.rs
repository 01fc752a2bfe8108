//! Pickables and timed power-ups
//!
//! A coin is one-shot: picking it up credits the balance once. A power-up
//! mutates [`SimParams`] on activation and reverts the mutation when its
//! timer runs out. Activation and deactivation each fire exactly once, no
//! matter how often `pick_up`/`update` are called afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Category, Positionable};
use super::geometry::Dimension;
use super::params::SimParams;
use crate::consts::*;
use crate::error::{Result, SimError};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PowerUpKind {
    CoinMultiplier,
    Invincibility,
    SlowCars,
}

impl PowerUpKind {
    pub fn category(self) -> Category {
        match self {
            PowerUpKind::CoinMultiplier => Category::CoinMultiplier,
            PowerUpKind::Invincibility => Category::Invincibility,
            PowerUpKind::SlowCars => Category::SlowCars,
        }
    }

    /// Effect with the default tuning for this kind
    pub fn default_effect(self) -> Effect {
        match self {
            PowerUpKind::CoinMultiplier => Effect::CoinMultiplier(COIN_MULTIPLIER_FACTOR),
            PowerUpKind::Invincibility => Effect::Invincibility,
            PowerUpKind::SlowCars => Effect::SlowCars(SLOW_CARS_FACTOR),
        }
    }
}

/// Parameter mutation carried by a power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Multiply the coin multiplier by the factor
    CoinMultiplier(u32),
    Invincibility,
    /// Scale the car speed multiplier by the factor
    SlowCars(f32),
}

impl Effect {
    pub fn kind(&self) -> PowerUpKind {
        match self {
            Effect::CoinMultiplier(_) => PowerUpKind::CoinMultiplier,
            Effect::Invincibility => PowerUpKind::Invincibility,
            Effect::SlowCars(_) => PowerUpKind::SlowCars,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Effect::CoinMultiplier(factor) if factor < 1 => Err(SimError::InvalidParameter {
                name: "coinMultiplierFactor",
                value: factor.to_string(),
            }),
            Effect::SlowCars(factor) if !factor.is_finite() || factor <= 0.0 => {
                Err(SimError::InvalidParameter {
                    name: "slowCarsFactor",
                    value: factor.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PowerUpState {
    Dormant,
    Active,
    Expired,
}

/// A timed parameter mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    effect: Effect,
    duration_ms: f32,
    remaining_ms: f32,
    state: PowerUpState,
    /// Invincibility flag before activation
    saved_invincible: bool,
}

impl PowerUp {
    pub fn new(effect: Effect, duration_ms: f32) -> Result<Self> {
        effect.validate()?;
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(SimError::InvalidParameter {
                name: "powerUpDuration",
                value: duration_ms.to_string(),
            });
        }
        Ok(Self {
            effect,
            duration_ms,
            remaining_ms: duration_ms,
            state: PowerUpState::Dormant,
            saved_invincible: false,
        })
    }

    pub fn kind(&self) -> PowerUpKind {
        self.effect.kind()
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    pub fn is_active(&self) -> bool {
        self.state == PowerUpState::Active
    }

    pub fn is_expired(&self) -> bool {
        self.state == PowerUpState::Expired
    }

    /// Apply the effect; returns `true` only on the first call
    pub fn activate(&mut self, params: &mut SimParams) -> Result<bool> {
        if self.state != PowerUpState::Dormant {
            return Ok(false);
        }
        match self.effect {
            Effect::CoinMultiplier(factor) => {
                params.set_coin_multiplier(params.coin_multiplier().saturating_mul(factor))?;
            }
            Effect::Invincibility => {
                self.saved_invincible = params.is_invincible();
                params.set_invincible(true);
            }
            Effect::SlowCars(factor) => {
                params.set_car_speed_multiplier(params.car_speed_multiplier() * factor)?;
            }
        }
        self.state = PowerUpState::Active;
        log::debug!("{:?} activated for {}ms", self.kind(), self.duration_ms);
        Ok(true)
    }

    /// Count down; returns `true` on the tick the effect is reverted
    pub fn update(&mut self, dt_ms: f32, params: &mut SimParams) -> Result<bool> {
        if self.state != PowerUpState::Active {
            return Ok(false);
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms > 0.0 {
            return Ok(false);
        }
        self.remaining_ms = 0.0;
        self.deactivate(params)?;
        Ok(true)
    }

    /// Restart the countdown of an active power-up
    pub fn refresh(&mut self) {
        if self.state == PowerUpState::Active {
            self.remaining_ms = self.duration_ms;
        }
    }

    fn deactivate(&mut self, params: &mut SimParams) -> Result<()> {
        match self.effect {
            Effect::CoinMultiplier(factor) => {
                params.set_coin_multiplier((params.coin_multiplier() / factor).max(1))?;
            }
            Effect::Invincibility => params.set_invincible(self.saved_invincible),
            Effect::SlowCars(factor) => {
                params.set_car_speed_multiplier(params.car_speed_multiplier() / factor)?;
            }
        }
        self.state = PowerUpState::Expired;
        log::debug!("{:?} expired", self.kind());
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Payload {
    Coin,
    PowerUp(PowerUp),
}

/// Something the player collects by stepping onto its cell
#[derive(Debug, Clone)]
pub struct Pickable {
    pos: Vec2,
    dim: Dimension,
    picked_up: bool,
    payload: Payload,
}

impl Pickable {
    pub fn coin(pos: Vec2) -> Self {
        Self {
            pos,
            dim: Dimension::CELL,
            picked_up: false,
            payload: Payload::Coin,
        }
    }

    pub fn power_up(pos: Vec2, effect: Effect, duration_ms: f32) -> Result<Self> {
        Ok(Self {
            pos,
            dim: Dimension::CELL,
            picked_up: false,
            payload: Payload::PowerUp(PowerUp::new(effect, duration_ms)?),
        })
    }

    pub fn is_picked_up(&self) -> bool {
        self.picked_up
    }

    pub fn is_coin(&self) -> bool {
        matches!(self.payload, Payload::Coin)
    }

    pub fn as_power_up(&self) -> Option<&PowerUp> {
        match &self.payload {
            Payload::PowerUp(p) => Some(p),
            Payload::Coin => None,
        }
    }

    /// Take the timed effect out of the pickable so it can outlive its chunk
    pub fn into_power_up(self) -> Option<PowerUp> {
        match self.payload {
            Payload::PowerUp(p) => Some(p),
            Payload::Coin => None,
        }
    }

    /// Collect: coins credit the current multiplier, power-ups activate.
    /// Returns `true` only on the first pickup.
    pub fn pick_up(&mut self, params: &mut SimParams) -> Result<bool> {
        if self.picked_up {
            return Ok(false);
        }
        match &mut self.payload {
            Payload::Coin => params.add_coins(params.coin_multiplier() as u64),
            Payload::PowerUp(p) => {
                p.activate(params)?;
            }
        }
        self.picked_up = true;
        Ok(true)
    }

    /// Flag as collected without applying the effect
    pub fn mark_picked_up(&mut self) {
        self.picked_up = true;
    }

    /// Advance the power-up timer (no-op for coins)
    pub fn update(&mut self, dt_ms: f32, params: &mut SimParams) -> Result<bool> {
        match &mut self.payload {
            Payload::Coin => Ok(false),
            Payload::PowerUp(p) => p.update(dt_ms, params),
        }
    }
}

impl Positionable for Pickable {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn dimension(&self) -> Dimension {
        self.dim
    }

    fn category(&self) -> Category {
        match &self.payload {
            Payload::Coin => Category::Coin,
            Payload::PowerUp(p) => p.kind().category(),
        }
    }

    fn shift_y(&mut self, dy: f32) {
        self.pos.y += dy;
    }
}
