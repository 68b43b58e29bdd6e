// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Extraction of per-metric 1RM time series from raw session history

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::curve_fitting::FitPoint;
use super::one_rep_max::best_set;
use crate::models::SessionRecord;

/// One estimated-1RM observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar days since the series origin
    pub day_offset: i64,
    pub value: f64,
    /// Timestamp of the session that produced `value`
    pub date: DateTime<Utc>,
}

/// Time window applied while extracting a series
#[derive(Debug, Clone, Copy)]
pub struct ExtractionWindow {
    /// Reference time; sessions after it are ignored
    pub now: DateTime<Utc>,
    /// Only keep sessions from the last `n` months
    pub lookback_months: Option<u32>,
    /// Fixed day zero; sessions on earlier calendar days are ignored.
    /// Defaults to the first qualifying session.
    pub origin: Option<DateTime<Utc>>,
}

impl ExtractionWindow {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            lookback_months: None,
            origin: None,
        }
    }

    pub fn with_lookback(mut self, months: Option<u32>) -> Self {
        self.lookback_months = months;
        self
    }

    pub fn with_origin(mut self, origin: DateTime<Utc>) -> Self {
        self.origin = Some(origin);
        self
    }

    fn lookback_cutoff(&self) -> Option<DateTime<Utc>> {
        self.lookback_months
            .and_then(|months| self.now.checked_sub_months(Months::new(months)))
    }
}

/// Chronological, one-per-day series of observations for a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    pub metric_id: String,
    /// Day zero of the series
    pub origin: DateTime<Utc>,
    pub points: Vec<Observation>,
}

impl ObservationSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Day offset of the most recent observation (0 for an empty series)
    pub fn span_days(&self) -> i64 {
        self.last().map_or(0, |o| o.day_offset)
    }

    /// Points in the shape the curve fitter consumes
    pub fn fit_points(&self) -> Vec<FitPoint> {
        self.points
            .iter()
            .map(|o| FitPoint::new(o.day_offset as f64, o.value))
            .collect()
    }
}

/// Build the observation series for `metric_id`.
///
/// Returns `None` when no session in the window yields a positive 1RM for the
/// metric. A series with a single point is returned as-is; whether it is
/// enough to fit is the curve fitter's decision.
pub fn extract_series(
    metric_id: &str,
    history: &[SessionRecord],
    window: &ExtractionWindow,
) -> Option<ObservationSeries> {
    let cutoff = window.lookback_cutoff();

    let mut qualifying: Vec<(DateTime<Utc>, f64)> = history
        .iter()
        .filter(|record| record.date <= window.now)
        .filter(|record| cutoff.map_or(true, |c| record.date >= c))
        .filter(|record| {
            window
                .origin
                .map_or(true, |o| record.date.date_naive() >= o.date_naive())
        })
        .filter_map(|record| {
            let sets = record.sets_for(metric_id)?;
            best_set(sets).map(|best| (record.date, best.one_rep_max))
        })
        .collect();

    qualifying.sort_by_key(|(date, _)| *date);

    let origin = window
        .origin
        .or_else(|| qualifying.first().map(|(date, _)| *date))?;
    let origin_day = origin.date_naive();

    let mut points: Vec<Observation> = Vec::with_capacity(qualifying.len());
    for (date, value) in qualifying {
        let day_offset = (date.date_naive() - origin_day).num_days();
        match points.last_mut() {
            Some(last) if last.day_offset == day_offset => {
                if value > last.value {
                    last.value = value;
                    last.date = date;
                }
            }
            _ => points.push(Observation {
                day_offset,
                value,
                date,
            }),
        }
    }

    if points.is_empty() {
        debug!(metric.id = %metric_id, "No qualifying observations");
        return None;
    }

    debug!(
        metric.id = %metric_id,
        observations = points.len(),
        span_days = points.last().map_or(0, |o| o.day_offset),
        "Extracted observation series"
    );

    Some(ObservationSeries {
        metric_id: metric_id.to_string(),
        origin,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SetEntry;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 17, 30, 0).unwrap() + Duration::days(n)
    }

    fn session(n: i64, metric: &str, weight: f64, reps: u32) -> SessionRecord {
        SessionRecord::new(day(n)).with_metric(metric, vec![SetEntry::new(weight, reps)])
    }

    #[test]
    fn test_offsets_relative_to_first_qualifying_session() {
        let history = vec![
            session(10, "bench", 200.0, 1),
            session(3, "squat", 300.0, 1),
            session(5, "bench", 180.0, 1),
        ];

        let series = extract_series("bench", &history, &ExtractionWindow::new(day(30))).unwrap();

        assert_eq!(series.origin, day(5));
        let pairs: Vec<(i64, f64)> = series.points.iter().map(|o| (o.day_offset, o.value)).collect();
        assert_eq!(pairs, vec![(0, 180.0), (5, 200.0)]);
    }

    #[test]
    fn test_same_day_keeps_maximum() {
        let mut late = session(2, "bench", 190.0, 1);
        late.date += Duration::hours(3);
        let history = vec![
            session(0, "bench", 180.0, 1),
            session(2, "bench", 185.0, 1),
            late,
            session(2, "bench", 170.0, 1),
        ];

        let series = extract_series("bench", &history, &ExtractionWindow::new(day(10))).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.points[1].value, 190.0);
        assert_eq!(series.points[1].day_offset, 2);
    }

    #[test]
    fn test_future_and_stale_records_are_dropped() {
        let history = vec![
            session(0, "bench", 150.0, 1),
            session(200, "bench", 180.0, 1),
            session(240, "bench", 190.0, 1),
            session(400, "bench", 250.0, 1),
        ];
        let window = ExtractionWindow::new(day(250)).with_lookback(Some(3));

        let series = extract_series("bench", &history, &window).unwrap();

        let values: Vec<f64> = series.points.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![180.0, 190.0]);
        assert_eq!(series.span_days(), 40);
    }

    #[test]
    fn test_sessions_without_valid_sets_are_skipped() {
        let history = vec![
            SessionRecord::new(day(0)).with_metric("bench", vec![]),
            session(1, "bench", 0.0, 5),
            session(4, "bench", 100.0, 5),
        ];

        let series = extract_series("bench", &history, &ExtractionWindow::new(day(10))).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.origin, day(4));
        assert_eq!(series.points[0].value, 113.0);
    }

    #[test]
    fn test_explicit_origin_excludes_earlier_days() {
        let history = vec![
            session(0, "bench", 170.0, 1),
            session(5, "bench", 185.0, 1),
            session(12, "bench", 195.0, 1),
        ];
        let window = ExtractionWindow::new(day(20)).with_origin(day(5));

        let series = extract_series("bench", &history, &window).unwrap();

        let pairs: Vec<(i64, f64)> = series.points.iter().map(|o| (o.day_offset, o.value)).collect();
        assert_eq!(pairs, vec![(0, 185.0), (7, 195.0)]);
        assert_eq!(series.points[1].date, day(12));
    }

    #[test]
    fn test_missing_metric_yields_none() {
        let history = vec![session(0, "squat", 200.0, 3)];
        assert!(extract_series("bench", &history, &ExtractionWindow::new(day(5))).is_none());
        assert!(extract_series("bench", &[], &ExtractionWindow::new(day(5))).is_none());
    }
}
