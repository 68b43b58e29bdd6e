// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Performance prediction for a single strength metric

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::confidence::performance_confidence;
use super::curve_fitting::{fit_linear, limiting_returns, ModelParameters};
use super::observations::{extract_series, ExtractionWindow};
use super::projection::project_horizon;
use super::recommendation_engine::{PerformanceSignals, RecommendationEngine};
use super::rep_ranges::{extrapolate_rep_ranges, OneRepMaxProjection};
use super::{PredictionMetadata, PredictionResult, TrendDirection};
use crate::config::ForecastConfig;
use crate::models::SessionRecord;

/// Trait for forecasting strength on a metric
pub trait PerformancePredictor {
    /// Predict the metric's estimated 1RM at the configured horizon.
    ///
    /// Returns `None` only when the history holds no qualifying observation
    /// for the metric. A single observation still yields a result, with zero
    /// confidence.
    fn predict_performance(
        &self,
        metric_id: &str,
        metric_label: &str,
        history: &[SessionRecord],
        lookback_months: Option<u32>,
        now: DateTime<Utc>,
    ) -> Option<PredictionResult>;
}

/// Limiting-returns performance analyzer
#[derive(Debug, Clone, Default)]
pub struct PerformanceAnalyzer {
    config: ForecastConfig,
}

impl PerformanceAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with the given configuration
    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl PerformancePredictor for PerformanceAnalyzer {
    fn predict_performance(
        &self,
        metric_id: &str,
        metric_label: &str,
        history: &[SessionRecord],
        lookback_months: Option<u32>,
        now: DateTime<Utc>,
    ) -> Option<PredictionResult> {
        let window = ExtractionWindow::new(now).with_lookback(lookback_months);
        let series = extract_series(metric_id, history, &window)?;
        let first = *series.first()?;
        let last = *series.last()?;

        let horizon_days = self.config.prediction.horizon_days;

        // Linear trend drives confidence and messaging; the projected value
        // comes from the limiting-returns curve anchored at the latest value.
        let trend = fit_linear(&series.fit_points());
        let model = limiting_returns(last.value, &self.config.prediction);
        let projection = project_horizon(&model, last.date, horizon_days);

        let breakdown = trend
            .as_ref()
            .map(|trend| performance_confidence(trend, horizon_days));
        let confidence = breakdown.map_or(0.0, |b| b.score);
        let slope_per_day = trend.as_ref().and_then(|trend| match trend.parameters {
            ModelParameters::Linear { slope, .. } => Some(slope),
            _ => None,
        });

        if trend.is_none() {
            debug!(
                metric.id = %metric_id,
                observations = series.len(),
                "No linear trend available"
            );
        }

        let rep_range_predictions = extrapolate_rep_ranges(
            &OneRepMaxProjection {
                start: first.value,
                current: last.value,
                predicted: projection.predicted_value,
                reference_date: last.date,
                projected_date: projection.predicted_date,
            },
            &self.config.rep_ranges,
        );

        let insights = RecommendationEngine::new(&self.config.recommendations).for_performance(
            &PerformanceSignals {
                metric_label,
                slope_per_day,
                first_value: first.value,
                confidence,
                elapsed_days: series.span_days(),
            },
        );

        let result = PredictionResult {
            metric_id: metric_id.to_string(),
            metric_label: metric_label.to_string(),
            current_value: last.value,
            predicted_value: round_to_tenth(projection.predicted_value),
            predicted_date: projection.predicted_date,
            confidence,
            rep_range_predictions,
            insights,
            metadata: PredictionMetadata {
                model: model.family(),
                trend_direction: slope_per_day.map(TrendDirection::from_slope),
                r_squared: trend.as_ref().map(|t| t.r_squared),
                slope_per_day,
                confidence_breakdown: breakdown,
                data_points: series.len(),
                horizon_days,
                first_observation_date: first.date,
                last_observation_date: last.date,
                lookback_months,
                generated_at: now,
            },
        };

        info!(
            metric.id = %metric_id,
            current = result.current_value,
            predicted = result.predicted_value,
            confidence = result.confidence,
            observations = result.metadata.data_points,
            "Performance prediction complete"
        );

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::messages;
    use crate::intelligence::ModelFamily;
    use crate::models::SetEntry;
    use chrono::{Duration, TimeZone};

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap() + Duration::days(n)
    }

    fn single(n: i64, weight: f64) -> SessionRecord {
        SessionRecord::new(day(n)).with_metric("bench", vec![SetEntry::new(weight, 1)])
    }

    #[test]
    fn test_two_point_prediction() {
        let analyzer = PerformanceAnalyzer::new();
        let history = vec![single(0, 180.0), single(30, 200.0)];

        let result = analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(35))
            .unwrap();

        assert_eq!(result.current_value, 200.0);
        assert_eq!(result.predicted_value, 246.9);
        assert_eq!(result.predicted_date, Some(day(30) + Duration::days(180)));

        // r² 1.0, data 0.3, residual 1.0, horizon 0.5
        assert!(approx_eq(result.confidence, 0.15, 1e-9));

        let slope = result.metadata.slope_per_day.unwrap();
        assert!(approx_eq(slope, 20.0 / 30.0, 1e-9));
        assert_eq!(result.metadata.model, ModelFamily::Logistic);
        assert_eq!(result.metadata.trend_direction, Some(TrendDirection::Improving));
        assert_eq!(result.metadata.data_points, 2);
        assert_eq!(result.metadata.generated_at, day(35));
    }

    #[test]
    fn test_prediction_insights() {
        let analyzer = PerformanceAnalyzer::new();
        let history = vec![single(0, 180.0), single(30, 200.0)];

        let result = analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(35))
            .unwrap();

        assert_eq!(result.insights.len(), 3);
        assert_eq!(result.insights[0], messages::STAY_CONSISTENT);
        assert!(result.insights[1].contains("11.1% per month"));
        assert_eq!(result.insights[2], messages::INCONSISTENT);
    }

    #[test]
    fn test_rep_range_rows() {
        let analyzer = PerformanceAnalyzer::new();
        let history = vec![single(0, 180.0), single(30, 200.0)];

        let result = analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(35))
            .unwrap();

        let labels: Vec<&str> = result
            .rep_range_predictions
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec!["1RM", "3RM", "5RM", "10RM"]);

        let five = &result.rep_range_predictions[2];
        assert_eq!(five.current_max, 178.0);
        assert_eq!(five.predicted_max, 220.0);
        assert_eq!(five.progress_percentage, 30);
        assert_eq!(
            five.estimated_achievement_date,
            Some(day(30) + Duration::days(126))
        );
    }

    #[test]
    fn test_out_of_range_horizon_drops_dates() {
        let mut config = ForecastConfig::default();
        config.prediction.horizon_days = 100_000_000;
        let analyzer = PerformanceAnalyzer::with_config(config);
        let history = vec![single(0, 180.0), single(30, 200.0)];

        let result = analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(35))
            .unwrap();

        assert!(result.predicted_date.is_none());
        assert!(result
            .rep_range_predictions
            .iter()
            .all(|r| r.estimated_achievement_date.is_none()));
        assert_eq!(result.predicted_value, 250.0);
    }

    #[test]
    fn test_single_observation_has_zero_confidence() {
        let analyzer = PerformanceAnalyzer::new();
        let history = vec![single(0, 180.0)];

        let result = analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(1))
            .unwrap();

        assert_eq!(result.confidence, 0.0);
        assert!(result.metadata.slope_per_day.is_none());
        assert!(result.metadata.confidence_breakdown.is_none());
        assert!(result.insights[1].to_lowercase().contains("not enough data"));
    }

    #[test]
    fn test_no_observations_yields_none() {
        let analyzer = PerformanceAnalyzer::new();
        let history = vec![single(0, 180.0)];

        assert!(analyzer
            .predict_performance("squat", "Squat", &history, None, day(1))
            .is_none());
        // Everything is in the future
        assert!(analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(-1))
            .is_none());
    }

    #[test]
    fn test_declining_trend_is_floored() {
        let analyzer = PerformanceAnalyzer::new();
        let history = vec![single(0, 200.0), single(20, 190.0), single(40, 185.0)];

        let result = analyzer
            .predict_performance("bench", "Bench Press", &history, None, day(40))
            .unwrap();

        assert_eq!(result.confidence, 0.05);
        assert_eq!(result.metadata.trend_direction, Some(TrendDirection::Declining));
        assert_eq!(result.insights[1], messages::PROGRESS_STALLED);
    }
}
