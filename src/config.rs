// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the forecasting engines

pub mod forecast_config;

use std::path::PathBuf;

pub use forecast_config::{
    ForecastConfig, GoalConfig, PredictionConfig, RecommendationConfig, RepRangeConfig,
};

/// File name looked up in the working directory before the user config dir
pub const LOCAL_CONFIG_FILE: &str = "liftcast.toml";

/// Per-user configuration file: `<config_dir>/liftcast/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("liftcast").join("config.toml"))
}

/// Errors raised when a loaded configuration violates engine invariants
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Projection horizon must be positive, got {0} days")]
    NonPositiveHorizon(i64),

    #[error("Projection horizon of {days} days exceeds the maximum of {max} days")]
    HorizonTooLong { days: i64, max: i64 },

    #[error("Gain cap ratio must be positive and finite, got {0}")]
    InvalidGainCap(f64),

    #[error("Rep range table must not be empty")]
    EmptyRepRanges,

    #[error("Rep range '{label}' has {field} {value} outside (0, 1]")]
    RepRangeFactorOutOfRange {
        label: String,
        field: &'static str,
        value: f64,
    },

    #[error("Milestone fraction {0} must lie strictly between 0 and 1")]
    MilestoneFractionOutOfRange(f64),

    #[error("Default goal timeline must be at least one month")]
    ZeroGoalTimeline,

    #[error("Recommendation limit must be at least 1")]
    ZeroRecommendationLimit,
}
