// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Confidence scoring for fitted models
//!
//! Two variants exist. Goal tracking trusts the logarithmic fit's R² directly
//! (bounded to `[0.1, 1.0]`). Performance prediction starts from the linear
//! trend's R² and degrades it for small samples, noisy residuals and long
//! extrapolation, bounded to `[0.05, 0.98]` with `0.99` reserved for perfect,
//! well-sampled fits.

use serde::{Deserialize, Serialize};

use super::curve_fitting::FittedModel;
use crate::constants::{confidence, fitting};

/// Individual factors behind a performance confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub r_squared: f64,
    pub data_factor: f64,
    pub residual_factor: f64,
    pub horizon_factor: f64,
    /// Final bounded score
    pub score: f64,
}

/// Goal-tracking confidence: R² clamped to `[0.1, 1.0]`, floored when the
/// model does not progress upward.
pub fn goal_confidence(model: &FittedModel) -> f64 {
    if !model.is_progressing() || model.r_squared.is_nan() {
        return confidence::GOAL_FLOOR;
    }
    model
        .r_squared
        .clamp(confidence::GOAL_FLOOR, confidence::GOAL_CEILING)
}

/// Sample-size factor
pub fn data_factor(point_count: usize) -> f64 {
    confidence::DATA_FACTORS
        .iter()
        .find(|(limit, _)| point_count < *limit)
        .map_or(1.0, |(_, factor)| *factor)
}

/// Population standard deviation
fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Residual noise factor: residual σ relative to the mean observed value
pub fn residual_factor(model: &FittedModel) -> f64 {
    if model.points.is_empty() {
        return confidence::ZERO_MEAN_RESIDUAL_FACTOR;
    }
    let mean_y = model.points.iter().map(|p| p.y).sum::<f64>() / model.points.len() as f64;
    if mean_y == 0.0 {
        return confidence::ZERO_MEAN_RESIDUAL_FACTOR;
    }

    let ratio = standard_deviation(&model.residuals()) / mean_y;
    confidence::RESIDUAL_FACTORS
        .iter()
        .find(|(threshold, _)| ratio > *threshold)
        .map_or(1.0, |(_, factor)| *factor)
}

/// Extrapolation factor for a projection `horizon_days` out, compared with the
/// last observed day offset
pub fn horizon_factor(horizon_days: i64, last_day_offset: i64) -> f64 {
    let excess = horizon_days - last_day_offset;
    confidence::HORIZON_FACTORS
        .iter()
        .find(|(days, _)| excess > *days)
        .map_or(1.0, |(_, factor)| *factor)
}

/// Performance-prediction confidence for a linear trend
pub fn performance_confidence(trend: &FittedModel, horizon_days: i64) -> ConfidenceBreakdown {
    let last_day_offset = trend.points.last().map_or(0.0, |p| p.x) as i64;
    let r_squared = trend.r_squared;
    let data = data_factor(trend.points.len());
    let residual = residual_factor(trend);
    let horizon = horizon_factor(horizon_days, last_day_offset);

    let residual_sigma = standard_deviation(&trend.residuals());
    let perfect_fit = (r_squared - 1.0).abs() < fitting::EXACT_TOLERANCE
        && residual_sigma < fitting::EXACT_TOLERANCE
        && trend.points.len() >= confidence::PERFECT_FIT_MIN_POINTS;

    let score = if !trend.is_progressing() {
        confidence::PERFORMANCE_FLOOR
    } else if perfect_fit {
        confidence::PERFECT_FIT
    } else {
        let raw = r_squared * data * residual * horizon;
        if raw.is_nan() {
            confidence::PERFORMANCE_FLOOR
        } else {
            raw.clamp(confidence::PERFORMANCE_FLOOR, confidence::PERFORMANCE_CEILING)
        }
    };

    ConfidenceBreakdown {
        r_squared,
        data_factor: data,
        residual_factor: residual,
        horizon_factor: horizon,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::curve_fitting::{fit_linear, fit_logarithmic, FitPoint, ModelParameters};

    fn linear_points(n: usize, step: f64, noise: &[f64]) -> Vec<FitPoint> {
        (0..n)
            .map(|i| {
                let x = i as f64 * step;
                let jitter = noise.get(i % noise.len().max(1)).copied().unwrap_or(0.0);
                FitPoint::new(x, 100.0 + 0.5 * x + jitter)
            })
            .collect()
    }

    #[test]
    fn test_data_factor_steps() {
        assert_eq!(data_factor(2), 0.3);
        assert_eq!(data_factor(3), 0.5);
        assert_eq!(data_factor(4), 0.5);
        assert_eq!(data_factor(5), 0.8);
        assert_eq!(data_factor(9), 0.8);
        assert_eq!(data_factor(10), 1.0);
        assert_eq!(data_factor(250), 1.0);
    }

    #[test]
    fn test_horizon_factor_steps() {
        assert_eq!(horizon_factor(180, 150), 1.0);
        assert_eq!(horizon_factor(180, 120), 1.0);
        assert_eq!(horizon_factor(180, 119), 0.7);
        assert_eq!(horizon_factor(180, 60), 0.7);
        assert_eq!(horizon_factor(180, 59), 0.5);
        assert_eq!(horizon_factor(180, 0), 0.5);
    }

    #[test]
    fn test_residual_factor_for_clean_and_noisy_fits() {
        let clean = fit_linear(&linear_points(8, 7.0, &[0.0])).unwrap();
        assert_eq!(residual_factor(&clean), 1.0);

        let noisy = fit_linear(&[
            FitPoint::new(0.0, 50.0),
            FitPoint::new(1.0, 150.0),
            FitPoint::new(2.0, 20.0),
            FitPoint::new(3.0, 160.0),
        ])
        .unwrap();
        assert!(residual_factor(&noisy) < 1.0);
    }

    /// Flat model around `center` with residuals alternating `+amplitude`/`-amplitude`
    fn zig_zag(center: f64, amplitude: f64) -> FittedModel {
        FittedModel {
            parameters: ModelParameters::Linear {
                slope: 0.0,
                intercept: center,
            },
            r_squared: 0.0,
            points: (0..10)
                .map(|i| {
                    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                    FitPoint::new(i as f64, center + sign * amplitude)
                })
                .collect(),
        }
    }

    #[test]
    fn test_residual_factor_bands() {
        // ratio = amplitude / 100
        assert_eq!(residual_factor(&zig_zag(100.0, 5.0)), 1.0);
        assert_eq!(residual_factor(&zig_zag(100.0, 10.0)), 1.0);
        assert_eq!(residual_factor(&zig_zag(100.0, 15.0)), 0.8);
        assert_eq!(residual_factor(&zig_zag(100.0, 20.0)), 0.8);
        assert_eq!(residual_factor(&zig_zag(100.0, 35.0)), 0.6);
        assert_eq!(residual_factor(&zig_zag(100.0, 50.0)), 0.6);
        assert_eq!(residual_factor(&zig_zag(100.0, 80.0)), 0.3);
    }

    #[test]
    fn test_residual_factor_with_zero_mean() {
        assert_eq!(residual_factor(&zig_zag(0.0, 5.0)), 0.3);
    }

    #[test]
    fn test_near_perfect_fit_hits_ceiling() {
        // Small noise: r² just under 1, data 1.0, residual 1.0, horizon 1.0
        let trend = fit_linear(&linear_points(12, 20.0, &[0.0, 0.5, -0.5])).unwrap();
        let breakdown = performance_confidence(&trend, 180);

        assert!(breakdown.r_squared < 1.0 - fitting::EXACT_TOLERANCE);
        assert!(breakdown.r_squared > 0.98);
        assert_eq!(breakdown.data_factor, 1.0);
        assert_eq!(breakdown.residual_factor, 1.0);
        assert_eq!(breakdown.horizon_factor, 1.0);
        assert_eq!(breakdown.score, 0.98);
    }

    #[test]
    fn test_perfect_well_sampled_fit_scores_099() {
        let trend = fit_linear(&linear_points(12, 14.0, &[0.0])).unwrap();
        let breakdown = performance_confidence(&trend, 180);
        assert_eq!(breakdown.score, 0.99);
    }

    #[test]
    fn test_perfect_fit_with_few_points_is_capped() {
        // 4 points, last offset 21: data 0.5, horizon 0.5
        let trend = fit_linear(&linear_points(4, 7.0, &[0.0])).unwrap();
        let breakdown = performance_confidence(&trend, 180);

        assert_eq!(breakdown.data_factor, 0.5);
        assert_eq!(breakdown.horizon_factor, 0.5);
        assert!((breakdown.score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_declining_trend_is_floored() {
        let trend = fit_linear(&[
            FitPoint::new(0.0, 200.0),
            FitPoint::new(30.0, 190.0),
            FitPoint::new(60.0, 185.0),
        ])
        .unwrap();
        assert_eq!(performance_confidence(&trend, 180).score, 0.05);
    }

    #[test]
    fn test_performance_confidence_bounds() {
        let noise = [0.0, 6.0, -4.0, 9.0, -7.0, 2.0];
        for n in 2..20 {
            let trend = fit_linear(&linear_points(n, 9.0, &noise)).unwrap();
            let score = performance_confidence(&trend, 180).score;
            assert!(!score.is_nan());
            assert!((0.05..=0.99).contains(&score), "score {} for n={}", score, n);
        }
    }

    #[test]
    fn test_goal_confidence_bounds_and_floor() {
        let rising = fit_logarithmic(&[
            FitPoint::new(5.0, 190.0),
            FitPoint::new(20.0, 197.0),
            FitPoint::new(40.0, 203.0),
        ])
        .unwrap();
        let score = goal_confidence(&rising);
        assert!((0.1..=1.0).contains(&score));

        let falling = fit_logarithmic(&[FitPoint::new(5.0, 200.0), FitPoint::new(40.0, 190.0)]).unwrap();
        assert_eq!(goal_confidence(&falling), 0.1);
    }
}
