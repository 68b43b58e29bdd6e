// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Projection solving: when will a model reach a value, and what value will
//! it reach by a horizon

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::curve_fitting::{FittedModel, ModelParameters};

/// Solve `model(x) = target` for the day offset `x`.
///
/// Returns `None` when the model does not progress, the target sits at or
/// below the model's reachable baseline, or the solution is not a finite
/// positive number of days.
pub fn days_to_reach(model: &FittedModel, target: f64) -> Option<f64> {
    let days = match model.parameters {
        ModelParameters::Linear { slope, intercept } => {
            if slope <= 0.0 || target <= intercept {
                return None;
            }
            (target - intercept) / slope
        }
        ModelParameters::Logarithmic { a, b } => {
            if b <= 0.0 || target <= a {
                return None;
            }
            ((target - a) / b).exp()
        }
        ModelParameters::Logistic {
            ceiling,
            growth_rate,
            midpoint,
            baseline,
        } => {
            // Only values strictly inside (baseline, baseline + ceiling) are reachable
            if ceiling <= 0.0 || growth_rate <= 0.0 {
                return None;
            }
            let gain = target - baseline;
            if gain <= 0.0 || gain >= ceiling {
                return None;
            }
            midpoint - (ceiling / gain - 1.0).ln() / growth_rate
        }
    };

    if days.is_finite() && days > 0.0 {
        Some(days)
    } else {
        debug!(days, target, "Degenerate projection discarded");
        None
    }
}

/// Calendar date at which the model reaches `target`, counting from `start_date`.
///
/// Partial days round up, so a projection is always strictly after the start.
pub fn project_date(
    model: &FittedModel,
    target: f64,
    start_date: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let days = days_to_reach(model, target)?.ceil();
    // Anything past chrono's representable range is as good as unreachable
    if days > i64::MAX as f64 {
        return None;
    }
    start_date.checked_add_signed(Duration::try_days(days as i64)?)
}

/// Value predicted at a fixed horizon after the last observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonProjection {
    pub predicted_value: f64,
    /// `None` when the horizon lands outside chrono's representable range
    pub predicted_date: Option<DateTime<Utc>>,
    pub horizon_days: i64,
}

/// Evaluate `model` at `horizon_days` and date the result from `last_observation`.
pub fn project_horizon(
    model: &FittedModel,
    last_observation: DateTime<Utc>,
    horizon_days: i64,
) -> HorizonProjection {
    HorizonProjection {
        predicted_value: model.evaluate(horizon_days as f64),
        predicted_date: Duration::try_days(horizon_days)
            .and_then(|span| last_observation.checked_add_signed(span)),
        horizon_days,
    }
}
