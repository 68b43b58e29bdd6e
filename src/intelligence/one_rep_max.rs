// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! One-rep-max estimation using the Brzycki relation

use serde::{Deserialize, Serialize};

use crate::constants::brzycki;
use crate::models::SetEntry;

/// Estimate a one-rep max from a single set.
///
/// `1RM = weight * 36 / (37 - reps)`. The relation blows up as reps approach
/// 37, so from 36 reps on the raw weight is returned. Zero reps or a
/// non-positive weight yield `0.0`.
///
/// ```rust
/// use liftcast::intelligence::one_rep_max::estimate_one_rep_max;
///
/// assert_eq!(estimate_one_rep_max(135.0, 10), 180.0);
/// assert_eq!(estimate_one_rep_max(100.0, 1), 100.0);
/// ```
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    if !weight.is_finite() || weight <= 0.0 || reps == 0 {
        return 0.0;
    }

    if reps >= brzycki::MAX_FORMULA_REPS {
        return weight;
    }

    weight * brzycki::NUMERATOR / (brzycki::REP_ASYMPTOTE - f64::from(reps))
}

/// The set of a session with the highest estimated one-rep max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestSet {
    pub weight: f64,
    pub reps: u32,
    /// Estimated 1RM, rounded to the nearest whole unit
    pub one_rep_max: f64,
}

/// Select the set with the highest estimated 1RM.
///
/// Returns `None` when no set yields a positive estimate; callers treat that
/// session as carrying no observation for the metric.
pub fn best_set(sets: &[SetEntry]) -> Option<BestSet> {
    sets.iter()
        .map(|set| (set, estimate_one_rep_max(set.weight, set.reps)))
        .filter(|(_, estimate)| *estimate > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(set, estimate)| BestSet {
            weight: set.weight,
            reps: set.reps,
            one_rep_max: estimate.round(),
        })
        .filter(|best| best.one_rep_max > 0.0)
}
