//! Simulation parameters
//!
//! The one mutable record shared by power-ups (which mutate it) and obstacles
//! (which read it). Every setter validates; nothing downstream ever observes
//! an out-of-range value.
//!
//! The record round-trips through JSON with the field names the persistence
//! collaborator expects (`coinMultiplier`, `carSpeedMultiplier`, ...). Loading
//! validates the whole record before adopting any of it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ParamsRecord")]
pub struct SimParams {
    coin_multiplier: u32,
    car_speed_multiplier: f32,
    train_speed_multiplier: f32,
    log_speed_multiplier: f32,
    invincible: bool,
    coin_count: u64,
    score: u64,
}

/// Unvalidated wire shape
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParamsRecord {
    coin_multiplier: i64,
    car_speed_multiplier: f32,
    train_speed_multiplier: f32,
    #[serde(default = "one")]
    log_speed_multiplier: f32,
    #[serde(default)]
    invincible: bool,
    coin_count: i64,
    score: i64,
}

fn one() -> f32 {
    1.0
}

impl TryFrom<ParamsRecord> for SimParams {
    type Error = SimError;

    fn try_from(rec: ParamsRecord) -> Result<Self> {
        let coin_multiplier = u32::try_from(rec.coin_multiplier)
            .map_err(|_| invalid("coinMultiplier", rec.coin_multiplier))?;
        let coin_count =
            u64::try_from(rec.coin_count).map_err(|_| invalid("coinCount", rec.coin_count))?;
        let score = u64::try_from(rec.score).map_err(|_| invalid("score", rec.score))?;

        let mut params = SimParams::default();
        params.set_coin_multiplier(coin_multiplier)?;
        params.set_car_speed_multiplier(rec.car_speed_multiplier)?;
        params.set_train_speed_multiplier(rec.train_speed_multiplier)?;
        params.set_log_speed_multiplier(rec.log_speed_multiplier)?;
        params.set_invincible(rec.invincible);
        params.coin_count = coin_count;
        params.score = score;
        Ok(params)
    }
}

fn invalid(name: &'static str, value: impl ToString) -> SimError {
    SimError::InvalidParameter {
        name,
        value: value.to_string(),
    }
}

fn check_multiplier(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(name, value))
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            coin_multiplier: 1,
            car_speed_multiplier: 1.0,
            train_speed_multiplier: 1.0,
            log_speed_multiplier: 1.0,
            invincible: false,
            coin_count: 0,
            score: 0,
        }
    }
}

impl SimParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coin_multiplier(&self) -> u32 {
        self.coin_multiplier
    }

    pub fn car_speed_multiplier(&self) -> f32 {
        self.car_speed_multiplier
    }

    pub fn train_speed_multiplier(&self) -> f32 {
        self.train_speed_multiplier
    }

    pub fn log_speed_multiplier(&self) -> f32 {
        self.log_speed_multiplier
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn coin_count(&self) -> u64 {
        self.coin_count
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn set_coin_multiplier(&mut self, value: u32) -> Result<()> {
        if value < 1 {
            return Err(invalid("coinMultiplier", value));
        }
        self.coin_multiplier = value;
        Ok(())
    }

    pub fn set_car_speed_multiplier(&mut self, value: f32) -> Result<()> {
        self.car_speed_multiplier = check_multiplier("carSpeedMultiplier", value)?;
        Ok(())
    }

    pub fn set_train_speed_multiplier(&mut self, value: f32) -> Result<()> {
        self.train_speed_multiplier = check_multiplier("trainSpeedMultiplier", value)?;
        Ok(())
    }

    pub fn set_log_speed_multiplier(&mut self, value: f32) -> Result<()> {
        self.log_speed_multiplier = check_multiplier("logSpeedMultiplier", value)?;
        Ok(())
    }

    pub fn set_invincible(&mut self, value: bool) {
        self.invincible = value;
    }

    /// Add `amount` coins to the balance
    pub fn add_coins(&mut self, amount: u64) {
        self.coin_count = self.coin_count.saturating_add(amount);
    }

    /// Spend coins if the balance allows it
    pub fn try_spend_coins(&mut self, amount: u64) -> bool {
        if amount > self.coin_count {
            return false;
        }
        self.coin_count -= amount;
        true
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Parse and validate a JSON record
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Replace the current values with a JSON record; on failure nothing changes
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        match Self::from_json(json) {
            Ok(params) => {
                *self = params;
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected parameter record: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = SimParams::new();
        assert_eq!(p.coin_multiplier(), 1);
        assert_eq!(p.car_speed_multiplier(), 1.0);
        assert!(!p.is_invincible());
        assert_eq!(p.coin_count(), 0);
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut p = SimParams::new();
        assert!(p.set_coin_multiplier(0).is_err());
        assert!(p.set_car_speed_multiplier(0.0).is_err());
        assert!(p.set_train_speed_multiplier(-1.0).is_err());
        assert!(p.set_log_speed_multiplier(f32::NAN).is_err());
        // Failed mutations leave the old value in place
        assert_eq!(p.coin_multiplier(), 1);
        assert_eq!(p.car_speed_multiplier(), 1.0);
        assert_eq!(p.train_speed_multiplier(), 1.0);
        assert_eq!(p.log_speed_multiplier(), 1.0);
    }

    #[test]
    fn test_spend_coins() {
        let mut p = SimParams::new();
        p.add_coins(5);
        assert!(!p.try_spend_coins(6));
        assert_eq!(p.coin_count(), 5);
        assert!(p.try_spend_coins(5));
        assert_eq!(p.coin_count(), 0);
    }

    #[test]
    fn test_json_round_trip_uses_camel_case() {
        let mut p = SimParams::new();
        p.set_coin_multiplier(3).unwrap();
        p.add_coins(42);
        let json = p.to_json().unwrap();
        assert!(json.contains("\"coinMultiplier\":3"));
        assert!(json.contains("\"carSpeedMultiplier\""));
        assert_eq!(SimParams::from_json(&json).unwrap(), p);
    }

    #[test]
    fn test_load_invalid_record_keeps_state() {
        let mut p = SimParams::new();
        p.add_coins(7);
        let before = p.clone();

        let bad = r#"{"coinMultiplier":0,"carSpeedMultiplier":1.0,"trainSpeedMultiplier":1.0,
            "logSpeedMultiplier":1.0,"invincible":false,"coinCount":3,"score":0}"#;
        assert!(p.load_json(bad).is_err());
        assert_eq!(p, before);

        let negative = r#"{"coinMultiplier":1,"carSpeedMultiplier":1.0,"trainSpeedMultiplier":1.0,
            "logSpeedMultiplier":1.0,"invincible":false,"coinCount":-3,"score":0}"#;
        assert!(p.load_json(negative).is_err());
        assert!(p.load_json("{not json").is_err());
        assert_eq!(p, before);
    }

    #[test]
    fn test_load_valid_record() {
        let mut p = SimParams::new();
        let good = r#"{"coinMultiplier":2,"carSpeedMultiplier":1.5,"trainSpeedMultiplier":0.5,
            "logSpeedMultiplier":1.0,"invincible":true,"coinCount":10,"score":99}"#;
        p.load_json(good).unwrap();
        assert_eq!(p.coin_multiplier(), 2);
        assert_eq!(p.car_speed_multiplier(), 1.5);
        assert!(p.is_invincible());
        assert_eq!(p.coin_count(), 10);
        assert_eq!(p.score(), 99);
    }
}
