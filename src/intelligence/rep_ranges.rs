// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rep-range extrapolation from a one-rep-max projection

use chrono::{DateTime, Duration, Utc};

use super::RepRangePrediction;
use crate::config::RepRangeConfig;

/// 1RM values the extrapolation is based on
#[derive(Debug, Clone, Copy)]
pub struct OneRepMaxProjection {
    /// 1RM at the start of the observed series
    pub start: f64,
    pub current: f64,
    pub predicted: f64,
    /// Date `current` was observed on
    pub reference_date: DateTime<Utc>,
    pub projected_date: Option<DateTime<Utc>>,
}

/// Map a 1RM projection onto every configured rep range.
///
/// Higher rep ranges respond sooner, so each row's achievement date is the
/// 1RM timeline scaled by the row's timeline factor.
pub fn extrapolate_rep_ranges(
    projection: &OneRepMaxProjection,
    table: &[RepRangeConfig],
) -> Vec<RepRangePrediction> {
    let days_until = projection
        .projected_date
        .map(|date| (date - projection.reference_date).num_days());

    table
        .iter()
        .map(|range| {
            let start_max = (projection.start * range.load_factor).round();
            let current_max = (projection.current * range.load_factor).round();
            let predicted_max = (projection.predicted * range.load_factor).round();

            let mut denominator = predicted_max - start_max;
            if denominator == 0.0 {
                denominator = 1.0;
            }
            let progress = ((current_max - start_max) / denominator * 100.0)
                .round()
                .clamp(0.0, 100.0);

            let estimated_achievement_date = days_until.map(|days| {
                let scaled = (days as f64 * range.timeline_factor).round() as i64;
                projection.reference_date + Duration::days(scaled)
            });

            RepRangePrediction {
                label: range.label.clone(),
                current_max,
                predicted_max,
                estimated_achievement_date,
                progress_percentage: progress as u8,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn projection(start: f64, current: f64, predicted: f64) -> OneRepMaxProjection {
        OneRepMaxProjection {
            start,
            current,
            predicted,
            reference_date: reference(),
            projected_date: Some(reference() + Duration::days(180)),
        }
    }

    #[test]
    fn test_five_rep_max_conversion() {
        let config = ForecastConfig::default();
        let rows = extrapolate_rep_ranges(&projection(180.0, 200.0, 220.0), &config.rep_ranges);

        let five = rows.iter().find(|r| r.label == "5RM").unwrap();
        assert_eq!(five.current_max, 178.0);
        assert_eq!(five.predicted_max, 196.0);

        let one = rows.iter().find(|r| r.label == "1RM").unwrap();
        assert_eq!(one.current_max, 200.0);
        assert_eq!(one.predicted_max, 220.0);
        assert_eq!(one.progress_percentage, 50);
    }

    #[test]
    fn test_higher_rep_ranges_arrive_sooner() {
        let config = ForecastConfig::default();
        let rows = extrapolate_rep_ranges(&projection(180.0, 200.0, 220.0), &config.rep_ranges);

        let dates: Vec<DateTime<Utc>> = rows
            .iter()
            .map(|r| r.estimated_achievement_date.unwrap())
            .collect();
        assert_eq!(dates[0], reference() + Duration::days(180));
        assert_eq!(dates[1], reference() + Duration::days(153));
        assert_eq!(dates[2], reference() + Duration::days(126));
        assert_eq!(dates[3], reference() + Duration::days(99));
    }

    #[test]
    fn test_no_projection_means_no_dates() {
        let config = ForecastConfig::default();
        let mut p = projection(180.0, 200.0, 220.0);
        p.projected_date = None;

        let rows = extrapolate_rep_ranges(&p, &config.rep_ranges);
        assert!(rows.iter().all(|r| r.estimated_achievement_date.is_none()));
    }

    #[test]
    fn test_progress_guards_and_clamps() {
        let config = ForecastConfig::default();

        // No expected gain: denominator substituted by 1, clamped to 100
        let flat = extrapolate_rep_ranges(&projection(200.0, 210.0, 200.0), &config.rep_ranges);
        assert!(flat.iter().all(|r| r.progress_percentage == 100));

        // Below the starting point clamps to 0
        let dropped = extrapolate_rep_ranges(&projection(200.0, 150.0, 240.0), &config.rep_ranges);
        assert!(dropped.iter().all(|r| r.progress_percentage == 0));
    }
}
