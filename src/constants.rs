// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed numeric constants used by the forecasting engines. Values that a
//! deployment may reasonably want to tune live in
//! [`crate::config::ForecastConfig`] and only take their defaults from here.

/// Brzycki one-rep-max relation
pub mod brzycki {
    /// Numerator coefficient in `weight * 36 / (37 - reps)`
    pub const NUMERATOR: f64 = 36.0;

    /// Rep count at which the denominator vanishes
    pub const REP_ASYMPTOTE: f64 = 37.0;

    /// From this rep count on the raw weight is returned unchanged
    pub const MAX_FORMULA_REPS: u32 = 36;
}

/// Minimum sample sizes for each model family
pub mod fitting {
    pub const MIN_POINTS_LINEAR: usize = 2;
    pub const MIN_POINTS_LOGARITHMIC: usize = 2;

    /// Tolerance used when testing fitted quantities for exact values
    pub const EXACT_TOLERANCE: f64 = 1e-9;
}

/// Limiting-returns projection defaults
pub mod limiting_returns {
    /// Fixed projection horizon in days
    pub const HORIZON_DAYS: i64 = 180;

    /// Longest horizon a configuration may request
    pub const MAX_HORIZON_DAYS: i64 = 3650;

    /// Maximum projected gain as a fraction of the current value
    pub const GAIN_CAP_RATIO: f64 = 0.25;

    /// Logistic steepness `k`
    pub const GROWTH_RATE: f64 = 0.03;

    /// Logistic inflection point `x0`, in days
    pub const INFLECTION_DAY: f64 = 90.0;
}

/// Confidence scoring thresholds.
///
/// These are empirical cut-offs carried over as-is; they are not derived from
/// any statistical model and must not be "improved" without a behaviour change
/// being intended.
pub mod confidence {
    /// Performance-mode bounds
    pub const PERFORMANCE_FLOOR: f64 = 0.05;
    pub const PERFORMANCE_CEILING: f64 = 0.98;
    pub const PERFECT_FIT: f64 = 0.99;
    pub const PERFECT_FIT_MIN_POINTS: usize = 10;

    /// Goal-mode bounds
    pub const GOAL_FLOOR: f64 = 0.1;
    pub const GOAL_CEILING: f64 = 1.0;

    /// Sample-size factor: (exclusive upper bound on point count, factor)
    pub const DATA_FACTORS: [(usize, f64); 3] = [(3, 0.3), (5, 0.5), (10, 0.8)];

    /// Residual noise factor: (ratio strictly above, factor), checked in order
    pub const RESIDUAL_FACTORS: [(f64, f64); 3] = [(0.5, 0.3), (0.2, 0.6), (0.1, 0.8)];

    /// Residual factor used when the mean observed value is zero
    pub const ZERO_MEAN_RESIDUAL_FACTOR: f64 = 0.3;

    /// Extrapolation distance factor: (days strictly beyond, factor), checked in order
    pub const HORIZON_FACTORS: [(i64, f64); 2] = [(120, 0.5), (60, 0.7)];
}

/// Rep-range conversion defaults: (label, load factor, timeline factor)
pub mod rep_ranges {
    pub const DEFAULT_TABLE: [(&str, f64, f64); 4] = [
        ("1RM", 1.00, 1.0),
        ("3RM", 0.94, 0.85),
        ("5RM", 0.89, 0.7),
        ("10RM", 0.75, 0.55),
    ];
}

/// Goal and milestone defaults
pub mod goals {
    /// Fallback timeline when neither the user nor the model supplies a date
    pub const DEFAULT_TIMELINE_MONTHS: u32 = 6;

    /// Fractions of the start→target range that receive a milestone
    pub const MILESTONE_FRACTIONS: [f64; 3] = [0.25, 0.50, 0.75];

    /// Two milestone values closer than this are treated as the same waypoint
    pub const VALUE_TOLERANCE: f64 = 1e-6;
}

/// Recommendation generation defaults
pub mod recommendations {
    pub const MAX_ENTRIES: usize = 4;

    /// Days of history after which stalls and inconsistency are reported
    pub const MIN_ELAPSED_DAYS: i64 = 14;

    pub const CONSISTENT_CONFIDENCE: f64 = 0.8;
    pub const INCONSISTENT_CONFIDENCE: f64 = 0.5;

    /// Days per month used for rate conversions
    pub const DAYS_PER_MONTH: f64 = 30.0;
}

/// User-facing messages
pub mod messages {
    pub const STAY_CONSISTENT: &str =
        "Stay consistent with your training schedule to keep building strength.";
    pub const NOT_ENOUGH_DATA: &str =
        "Not enough data to project a trend yet. Log a few more sessions to unlock predictions.";
    pub const PROGRESS_STALLED: &str =
        "Progress has stalled. Review your training plan: consider adjusting volume, intensity or recovery.";
    pub const QUITE_CONSISTENT: &str =
        "Your progress has been quite consistent, so this forecast is fairly reliable.";
    pub const INCONSISTENT: &str =
        "Your results have been inconsistent. Steadier training will make forecasts more reliable.";
}

/// Service identity used in logs
pub mod service {
    pub const SERVICE_NAME: &str = "liftcast";

    /// Crate version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
