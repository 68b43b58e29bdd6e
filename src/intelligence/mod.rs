// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Forecasting over strength-training history.
//!
//! This module includes:
//! - One-rep-max estimation and observation extraction
//! - Linear, logarithmic and limiting-returns curve fitting
//! - Confidence scoring and projection solving
//! - Rep-range extrapolation
//! - Goal milestone tracking
//! - Training recommendations
//!
//! The two entry points are [`PerformanceAnalyzer::predict_performance`] and
//! [`GoalEngine::process_goal`]. Both are pure functions of their inputs and
//! an explicit reference time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod confidence;
pub mod curve_fitting;
pub mod goal_engine;
pub mod milestones;
pub mod observations;
pub mod one_rep_max;
pub mod performance_analyzer;
pub mod projection;
pub mod recommendation_engine;
pub mod rep_ranges;

pub use confidence::ConfidenceBreakdown;
pub use curve_fitting::{FitPoint, FittedModel, ModelFamily, ModelParameters};
pub use goal_engine::{GoalEngine, GoalTracker};
pub use observations::{ExtractionWindow, Observation, ObservationSeries};
pub use performance_analyzer::{PerformanceAnalyzer, PerformancePredictor};
pub use recommendation_engine::RecommendationEngine;

use crate::models::Goal;

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    /// Classify a daily slope
    pub fn from_slope(slope: f64) -> Self {
        if slope.abs() < 1e-9 {
            Self::Stable
        } else if slope > 0.0 {
            Self::Improving
        } else {
            Self::Declining
        }
    }
}

/// Forecast for one rep range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRangePrediction {
    /// Rep range label, e.g. "5RM"
    pub label: String,
    pub current_max: f64,
    pub predicted_max: f64,
    pub estimated_achievement_date: Option<DateTime<Utc>>,
    /// Share of the projected gain already realised since the series start (0-100)
    pub progress_percentage: u8,
}

/// How a prediction was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetadata {
    /// Model used for the projected value
    pub model: ModelFamily,
    /// Direction of the linear trend, if one could be fit
    pub trend_direction: Option<TrendDirection>,
    pub r_squared: Option<f64>,
    pub slope_per_day: Option<f64>,
    pub confidence_breakdown: Option<ConfidenceBreakdown>,
    pub data_points: usize,
    pub horizon_days: i64,
    pub first_observation_date: DateTime<Utc>,
    pub last_observation_date: DateTime<Utc>,
    pub lookback_months: Option<u32>,
    /// Reference time the prediction was computed against
    pub generated_at: DateTime<Utc>,
}

/// Performance forecast for a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub metric_id: String,
    pub metric_label: String,
    /// Most recent estimated 1RM
    pub current_value: f64,
    pub predicted_value: f64,
    pub predicted_date: Option<DateTime<Utc>>,
    /// Trust in the forecast, 0-1
    pub confidence: f64,
    pub rep_range_predictions: Vec<RepRangePrediction>,
    pub insights: Vec<String>,
    pub metadata: PredictionMetadata,
}

/// A goal together with everything the engine derived for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedGoal {
    /// The input goal with its milestone list normalised and updated
    pub goal: Goal,
    /// Latest observed value since the goal started (the start value if none)
    pub current_value: f64,
    /// Progress from start to target value, 0-100
    pub progress_percentage: f64,
    pub projected_date: Option<DateTime<Utc>>,
    pub confidence: Option<f64>,
    /// Whether the projection beats the user's deadline; `None` without both dates
    pub on_track: Option<bool>,
    pub milestones_achieved: usize,
}
