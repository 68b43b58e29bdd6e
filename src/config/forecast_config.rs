// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tunable parameters for projections, rep ranges, goals and recommendations

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{user_config_path, ConfigValidationError, LOCAL_CONFIG_FILE};
use crate::constants::{goals, limiting_returns, recommendations, rep_ranges};

/// Main forecasting configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub prediction: PredictionConfig,
    pub rep_ranges: Vec<RepRangeConfig>,
    pub goals: GoalConfig,
    pub recommendations: RecommendationConfig,
}

/// Limiting-returns projection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub horizon_days: i64,
    /// Ceiling `L` as a fraction of the current value
    pub gain_cap_ratio: f64,
    /// Logistic steepness `k`
    pub growth_rate: f64,
    /// Logistic midpoint `x0` in days
    pub inflection_day: f64,
}

/// One row of the rep-range conversion table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRangeConfig {
    pub label: String,
    /// Fraction of the 1RM liftable for this rep range
    pub load_factor: f64,
    /// Fraction of the 1RM projection timeline needed to reach this range's target
    pub timeline_factor: f64,
}

/// Goal and milestone parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    pub default_timeline_months: u32,
    pub milestone_fractions: Vec<f64>,
}

/// Recommendation generator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub max_entries: usize,
    pub min_elapsed_days: i64,
    pub consistent_confidence: f64,
    pub inconsistent_confidence: f64,
}

impl ForecastConfig {
    /// Load configuration from an explicit file, the working directory, the
    /// user config directory, or fall back to embedded defaults (in that order)
    pub fn load(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(&config_path);
        }

        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::load_from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(user_path) = user_config_path().filter(|p| p.exists()) {
            return Self::load_from_file(&user_path.to_string_lossy());
        }

        debug!("No forecast config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read forecast config file: {}", path))?;

        let config: ForecastConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse forecast config file: {}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid forecast config file: {}", path))?;

        debug!(config.path = %path, "Loaded forecast config");
        Ok(config)
    }

    /// Check the invariants the engines rely on
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.prediction.horizon_days <= 0 {
            return Err(ConfigValidationError::NonPositiveHorizon(
                self.prediction.horizon_days,
            ));
        }
        if self.prediction.horizon_days > limiting_returns::MAX_HORIZON_DAYS {
            return Err(ConfigValidationError::HorizonTooLong {
                days: self.prediction.horizon_days,
                max: limiting_returns::MAX_HORIZON_DAYS,
            });
        }
        let gain = self.prediction.gain_cap_ratio;
        if !gain.is_finite() || gain <= 0.0 {
            return Err(ConfigValidationError::InvalidGainCap(gain));
        }

        if self.rep_ranges.is_empty() {
            return Err(ConfigValidationError::EmptyRepRanges);
        }
        for range in &self.rep_ranges {
            for (field, value) in [
                ("load_factor", range.load_factor),
                ("timeline_factor", range.timeline_factor),
            ] {
                if !(value > 0.0 && value <= 1.0) {
                    return Err(ConfigValidationError::RepRangeFactorOutOfRange {
                        label: range.label.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        if let Some(&bad) = self
            .goals
            .milestone_fractions
            .iter()
            .find(|&&f| !(f > 0.0 && f < 1.0))
        {
            return Err(ConfigValidationError::MilestoneFractionOutOfRange(bad));
        }
        if self.goals.default_timeline_months == 0 {
            return Err(ConfigValidationError::ZeroGoalTimeline);
        }

        if self.recommendations.max_entries == 0 {
            return Err(ConfigValidationError::ZeroRecommendationLimit);
        }

        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            prediction: PredictionConfig::default(),
            rep_ranges: rep_ranges::DEFAULT_TABLE
                .iter()
                .map(|&(label, load_factor, timeline_factor)| RepRangeConfig {
                    label: label.to_string(),
                    load_factor,
                    timeline_factor,
                })
                .collect(),
            goals: GoalConfig::default(),
            recommendations: RecommendationConfig::default(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            horizon_days: limiting_returns::HORIZON_DAYS,
            gain_cap_ratio: limiting_returns::GAIN_CAP_RATIO,
            growth_rate: limiting_returns::GROWTH_RATE,
            inflection_day: limiting_returns::INFLECTION_DAY,
        }
    }
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            default_timeline_months: goals::DEFAULT_TIMELINE_MONTHS,
            milestone_fractions: goals::MILESTONE_FRACTIONS.to_vec(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_entries: recommendations::MAX_ENTRIES,
            min_elapsed_days: recommendations::MIN_ELAPSED_DAYS,
            consistent_confidence: recommendations::CONSISTENT_CONFIDENCE,
            inconsistent_confidence: recommendations::INCONSISTENT_CONFIDENCE,
        }
    }
}
