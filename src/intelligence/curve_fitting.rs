// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Least-squares curve fitting for linear, logarithmic and limiting-returns models

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PredictionConfig;
use crate::constants::fitting;

/// An `(x, y)` sample; `x` is a day offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitPoint {
    pub x: f64,
    pub y: f64,
}

impl FitPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Model family tag, used in result metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    Linear,
    Logarithmic,
    Logistic,
}

/// Parameters of a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelParameters {
    /// `y = slope·x + intercept`
    Linear { slope: f64, intercept: f64 },
    /// `y = a + b·ln(x)`
    Logarithmic { a: f64, b: f64 },
    /// `y = ceiling / (1 + e^(-growth_rate·(x - midpoint))) + baseline`
    Logistic {
        ceiling: f64,
        growth_rate: f64,
        midpoint: f64,
        baseline: f64,
    },
}

/// A model together with its goodness of fit and the points it was fit from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub parameters: ModelParameters,
    /// Coefficient of determination. Derived (not fitted) models carry `0.0`.
    pub r_squared: f64,
    /// Input points, ordered by `x`; empty for derived models
    pub points: Vec<FitPoint>,
}

impl FittedModel {
    pub fn family(&self) -> ModelFamily {
        match self.parameters {
            ModelParameters::Linear { .. } => ModelFamily::Linear,
            ModelParameters::Logarithmic { .. } => ModelFamily::Logarithmic,
            ModelParameters::Logistic { .. } => ModelFamily::Logistic,
        }
    }

    /// Model value at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.parameters {
            ModelParameters::Linear { slope, intercept } => slope.mul_add(x, intercept),
            ModelParameters::Logarithmic { a, b } => b.mul_add(x.ln(), a),
            ModelParameters::Logistic {
                ceiling,
                growth_rate,
                midpoint,
                baseline,
            } => ceiling / (1.0 + (-growth_rate * (x - midpoint)).exp()) + baseline,
        }
    }

    /// Whether the model describes upward progression
    pub fn is_progressing(&self) -> bool {
        match self.parameters {
            ModelParameters::Linear { slope, .. } => slope > 0.0,
            ModelParameters::Logarithmic { b, .. } => b > 0.0,
            ModelParameters::Logistic {
                ceiling,
                growth_rate,
                ..
            } => ceiling > 0.0 && growth_rate > 0.0,
        }
    }

    /// Observed minus predicted, for every fit point
    pub fn residuals(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y - self.evaluate(p.x)).collect()
    }
}

/// Ordinary least squares on `(x, y)` pairs: `(slope, intercept, r_squared)`.
///
/// `None` when fewer than two points are given or x has no variance.
fn least_squares(xs: &[f64], ys: &[f64]) -> Option<(f64, f64, f64)> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    if sxx.abs() < f64::EPSILON {
        return None;
    }
    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);

    let ss_tot: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - slope.mul_add(*x, intercept)).powi(2))
        .sum();

    let r_squared = if ss_tot.abs() < f64::EPSILON {
        if ss_res.abs() < fitting::EXACT_TOLERANCE {
            1.0
        } else {
            0.0
        }
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    Some((slope, intercept, r_squared))
}

/// Fit `y = slope·x + intercept`.
///
/// A non-positive slope is still returned; callers check
/// [`FittedModel::is_progressing`].
pub fn fit_linear(points: &[FitPoint]) -> Option<FittedModel> {
    if points.len() < fitting::MIN_POINTS_LINEAR {
        return None;
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let (slope, intercept, r_squared) = least_squares(&xs, &ys)?;

    debug!(slope, intercept, r_squared, points = points.len(), "Linear fit");

    Some(FittedModel {
        parameters: ModelParameters::Linear { slope, intercept },
        r_squared,
        points: points.to_vec(),
    })
}

/// Fit `y = a + b·ln(x)` over the points with `x > 0`.
pub fn fit_logarithmic(points: &[FitPoint]) -> Option<FittedModel> {
    let usable: Vec<FitPoint> = points.iter().copied().filter(|p| p.x > 0.0).collect();
    if usable.len() < fitting::MIN_POINTS_LOGARITHMIC {
        debug!(
            usable = usable.len(),
            total = points.len(),
            "Not enough positive-x points for logarithmic fit"
        );
        return None;
    }

    let ln_xs: Vec<f64> = usable.iter().map(|p| p.x.ln()).collect();
    let ys: Vec<f64> = usable.iter().map(|p| p.y).collect();
    let (b, a, r_squared) = least_squares(&ln_xs, &ys)?;

    debug!(a, b, r_squared, points = usable.len(), "Logarithmic fit");

    Some(FittedModel {
        parameters: ModelParameters::Logarithmic { a, b },
        r_squared,
        points: usable,
    })
}

/// Derive the limiting-returns model for a lifter currently at `current_value`.
///
/// Parameters are not fitted: the baseline is the current value, the ceiling
/// is a fixed fraction of it, and the curve bends at the configured inflection
/// day.
pub fn limiting_returns(current_value: f64, config: &PredictionConfig) -> FittedModel {
    FittedModel {
        parameters: ModelParameters::Logistic {
            ceiling: config.gain_cap_ratio * current_value,
            growth_rate: config.growth_rate,
            midpoint: config.inflection_day,
            baseline: current_value,
        },
        r_squared: 0.0,
        points: Vec::new(),
    }
}
