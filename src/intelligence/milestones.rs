// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Milestone lifecycle: normalising a goal's waypoints and marking them achieved

use chrono::{DateTime, Duration, Months, Utc};
use tracing::debug;

use super::observations::ObservationSeries;
use crate::config::GoalConfig;
use crate::constants::goals::VALUE_TOLERANCE;
use crate::models::{Goal, Milestone};

fn same_value(a: f64, b: f64) -> bool {
    (a - b).abs() < VALUE_TOLERANCE
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Target date for the final milestone: the user's deadline, else the
/// projected date, else the default timeline from the goal start.
pub fn resolve_target_date(
    goal: &Goal,
    projected_date: Option<DateTime<Utc>>,
    config: &GoalConfig,
) -> DateTime<Utc> {
    goal.user_target_date
        .or(projected_date)
        .or_else(|| default_target_date(goal.start_date, config.default_timeline_months))
        .unwrap_or(goal.start_date)
}

/// `start + months`, falling back to 30-day months; `None` past chrono's range
fn default_target_date(start: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    start.checked_add_months(Months::new(months)).or_else(|| {
        Duration::try_days(30 * i64::from(months)).and_then(|span| start.checked_add_signed(span))
    })
}

/// Build the normalised, ascending milestone list for `goal`.
///
/// Existing milestones are kept (duplicates by value collapse onto the first
/// occurrence). Missing start, target and interpolated waypoints are added.
pub fn normalize_milestones(
    goal: &Goal,
    projected_date: Option<DateTime<Utc>>,
    config: &GoalConfig,
) -> Vec<Milestone> {
    let mut milestones: Vec<Milestone> = Vec::with_capacity(goal.milestones.len() + 5);
    for existing in &goal.milestones {
        if !milestones.iter().any(|m| same_value(m.value, existing.value)) {
            milestones.push(existing.clone());
        }
    }

    match milestones
        .iter_mut()
        .find(|m| same_value(m.value, goal.start_value))
    {
        Some(start) => {
            start.achieved_date.get_or_insert(goal.start_date);
        }
        None => milestones.push(Milestone {
            value: goal.start_value,
            target_date: goal.start_date,
            achieved_date: Some(goal.start_date),
        }),
    }

    let target_date = match milestones
        .iter()
        .find(|m| same_value(m.value, goal.target_value))
    {
        Some(target) => target.target_date,
        None => {
            let date = resolve_target_date(goal, projected_date, config);
            milestones.push(Milestone::new(goal.target_value, date));
            date
        }
    };

    let range = goal.target_value - goal.start_value;
    let timeline_seconds = (target_date - goal.start_date).num_seconds() as f64;
    for &fraction in &config.milestone_fractions {
        let value = round_to_tenth(goal.start_value + range * fraction);
        if milestones.iter().any(|m| same_value(m.value, value)) {
            continue;
        }
        let offset = Duration::seconds((timeline_seconds * fraction).round() as i64);
        milestones.push(Milestone::new(value, goal.start_date + offset));
    }

    milestones.sort_by(|a, b| a.value.total_cmp(&b.value));
    milestones
}

/// Stamp `achieved_date` on every open milestone that the series has reached.
///
/// Already-achieved milestones keep their original date.
pub fn mark_achievements(milestones: &mut [Milestone], series: Option<&ObservationSeries>) {
    let Some(series) = series else {
        return;
    };

    for milestone in milestones.iter_mut().filter(|m| !m.is_achieved()) {
        if let Some(hit) = series
            .points
            .iter()
            .find(|o| o.value >= milestone.value - VALUE_TOLERANCE)
        {
            debug!(
                milestone.value = milestone.value,
                achieved = %hit.date,
                "Milestone reached"
            );
            milestone.achieved_date = Some(hit.date);
        }
    }
}

/// Normalise a goal's milestones and mark those reached by the series
pub fn build_milestones(
    goal: &Goal,
    projected_date: Option<DateTime<Utc>>,
    series: Option<&ObservationSeries>,
    config: &GoalConfig,
) -> Vec<Milestone> {
    let mut milestones = normalize_milestones(goal, projected_date, config);
    mark_achievements(&mut milestones, series);
    milestones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::observations::Observation;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn goal() -> Goal {
        Goal::new("Bench 225", 185.0, 225.0, start(), "lb").for_exercise("bench")
    }

    fn series(values: &[(i64, f64)]) -> ObservationSeries {
        ObservationSeries {
            metric_id: "bench".to_string(),
            origin: start(),
            points: values
                .iter()
                .map(|&(day, value)| Observation {
                    day_offset: day,
                    value,
                    date: start() + Duration::days(day),
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_milestones_are_populated_and_sorted() {
        let milestones = normalize_milestones(&goal(), None, &GoalConfig::default());

        let values: Vec<f64> = milestones.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![185.0, 195.0, 205.0, 215.0, 225.0]);

        // Start is achieved on creation; target falls back to six months
        assert_eq!(milestones[0].achieved_date, Some(start()));
        let six_months = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(milestones[4].target_date, six_months);
        assert!(milestones[4].achieved_date.is_none());
    }

    #[test]
    fn test_interpolated_dates_follow_the_timeline() {
        let deadline = start() + Duration::days(100);
        let milestones =
            normalize_milestones(&goal().with_target_date(deadline), None, &GoalConfig::default());

        assert_eq!(milestones[1].target_date, start() + Duration::days(25));
        assert_eq!(milestones[2].target_date, start() + Duration::days(50));
        assert_eq!(milestones[3].target_date, start() + Duration::days(75));
        assert_eq!(milestones[4].target_date, deadline);
    }

    #[test]
    fn test_projected_date_used_without_deadline() {
        let projected = start() + Duration::days(70);
        let milestones = normalize_milestones(&goal(), Some(projected), &GoalConfig::default());
        assert_eq!(milestones.last().unwrap().target_date, projected);

        // A user deadline wins over the projection
        let deadline = start() + Duration::days(40);
        let milestones =
            normalize_milestones(&goal().with_target_date(deadline), Some(projected), &GoalConfig::default());
        assert_eq!(milestones.last().unwrap().target_date, deadline);
    }

    #[test]
    fn test_existing_milestones_are_preserved_and_deduplicated() {
        let mut g = goal();
        let custom_date = start() + Duration::days(10);
        g.milestones = vec![
            Milestone::new(225.0, start() + Duration::days(90)),
            Milestone::new(200.0, custom_date),
            Milestone::new(225.0, start() + Duration::days(365)),
            Milestone::new(205.0, custom_date),
        ];

        let milestones = normalize_milestones(&g, None, &GoalConfig::default());

        let values: Vec<f64> = milestones.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![185.0, 195.0, 200.0, 205.0, 215.0, 225.0]);
        assert_eq!(milestones.iter().filter(|m| m.value == 225.0).count(), 1);
        assert_eq!(milestones.iter().filter(|m| m.value == 185.0).count(), 1);
        // The first target milestone wins and drives interpolation
        assert_eq!(milestones[5].target_date, start() + Duration::days(90));
        assert_eq!(milestones[3].target_date, custom_date);
    }

    #[test]
    fn test_achievement_scan_uses_first_crossing() {
        let s = series(&[(0, 185.0), (10, 196.0), (20, 194.0), (35, 207.0), (50, 210.0)]);
        let milestones = build_milestones(&goal(), None, Some(&s), &GoalConfig::default());

        assert_eq!(milestones[1].achieved_date, Some(start() + Duration::days(10)));
        assert_eq!(milestones[2].achieved_date, Some(start() + Duration::days(35)));
        assert!(milestones[3].achieved_date.is_none());
        assert!(milestones[4].achieved_date.is_none());
    }

    #[test]
    fn test_existing_achievement_dates_are_kept() {
        let mut g = goal();
        let earlier = start() + Duration::days(3);
        g.milestones = vec![Milestone {
            value: 195.0,
            target_date: start() + Duration::days(45),
            achieved_date: Some(earlier),
        }];

        let s = series(&[(0, 185.0), (20, 199.0)]);
        let milestones = build_milestones(&g, None, Some(&s), &GoalConfig::default());
        assert_eq!(milestones[1].achieved_date, Some(earlier));
    }

    #[test]
    fn test_default_target_date_near_range_end() {
        let late_start = DateTime::<Utc>::MAX_UTC - Duration::days(10);
        let g = Goal::new("Bench 225", 185.0, 225.0, late_start, "lb");

        assert_eq!(resolve_target_date(&g, None, &GoalConfig::default()), late_start);

        let milestones = normalize_milestones(&g, None, &GoalConfig::default());
        assert_eq!(milestones.len(), 5);
        assert!(milestones.iter().all(|m| m.target_date == late_start));
    }

    #[test]
    fn test_fractional_values_are_rounded() {
        let g = Goal::new("Squat", 100.0, 110.5, start(), "kg");
        let milestones = normalize_milestones(&g, None, &GoalConfig::default());

        let values: Vec<f64> = milestones.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![100.0, 102.6, 105.3, 107.9, 110.5]);
    }
}
