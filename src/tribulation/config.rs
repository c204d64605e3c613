//! Tunables for tribulation strikes, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("chance bounds invalid (min {min:.2} > max {max:.2})")]
    ChanceBounds { min: f64, max: f64 },
    #[error("{field} must be between 0 and 1 (got {value:.2})")]
    Probability { field: &'static str, value: f64 },
    #[error("strike_hp_percent must be at most 100 (got {0})")]
    StrikePercent(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TribulationConfig {
    /// Survival chance per strike before stat weighting.
    pub base_survival_chance: f64,
    /// Weights applied to the player's stat as a fraction of the target realm's base.
    pub defense_weight: f64,
    pub spirit_weight: f64,
    pub physique_weight: f64,
    /// Added per point of luck.
    pub luck_weight: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    /// Percent of max hp lost to each survived strike.
    pub strike_hp_percent: u32,
    /// Cosmetic pause before the confirmation modal appears.
    pub reveal_delay_ms: u64,
}

impl Default for TribulationConfig {
    fn default() -> Self {
        Self {
            base_survival_chance: 0.55,
            defense_weight: 0.10,
            spirit_weight: 0.10,
            physique_weight: 0.10,
            luck_weight: 0.005,
            min_chance: 0.30,
            max_chance: 0.97,
            strike_hp_percent: 5,
            reveal_delay_ms: 800,
        }
    }
}

impl TribulationConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("base_survival_chance", self.base_survival_chance),
            ("min_chance", self.min_chance),
            ("max_chance", self.max_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }
        if self.min_chance > self.max_chance {
            return Err(ConfigError::ChanceBounds {
                min: self.min_chance,
                max: self.max_chance,
            });
        }
        if self.strike_hp_percent > 100 {
            return Err(ConfigError::StrikePercent(self.strike_hp_percent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TribulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TribulationConfig::from_json(r#"{ "strike_hp_percent": 12 }"#).unwrap();
        assert_eq!(config.strike_hp_percent, 12);
        assert_eq!(
            config.base_survival_chance,
            TribulationConfig::default().base_survival_chance
        );
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = TribulationConfig::from_json(r#"{ "min_chance": 0.9, "max_chance": 0.5 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ChanceBounds { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let err = TribulationConfig::from_json(r#"{ "base_survival_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Probability {
                field: "base_survival_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_strike_percent_over_100() {
        let err = TribulationConfig::from_json(r#"{ "strike_hp_percent": 50000000 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::StrikePercent(50_000_000)));
        assert!(TribulationConfig::from_json(r#"{ "strike_hp_percent": 100 }"#).is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = TribulationConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TribulationConfig::load_from_path(Path::new("/nonexistent/wasteland.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
