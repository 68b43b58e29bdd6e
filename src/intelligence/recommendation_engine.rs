// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rule-based training recommendations derived from fitted trends

use chrono::{DateTime, Utc};

use crate::config::RecommendationConfig;
use crate::constants::{messages, recommendations::DAYS_PER_MONTH};

/// Trend summary for a performance prediction
#[derive(Debug, Clone)]
pub struct PerformanceSignals<'a> {
    pub metric_label: &'a str,
    /// Daily slope of the linear trend; `None` when no trend could be fit
    pub slope_per_day: Option<f64>,
    /// First observed 1RM in the series
    pub first_value: f64,
    pub confidence: f64,
    /// Days covered by the observed series
    pub elapsed_days: i64,
}

/// Trend summary for a goal evaluation
#[derive(Debug, Clone)]
pub struct GoalSignals<'a> {
    /// Logarithmic growth coefficient `b`; `None` when no model could be fit
    pub growth_coefficient: Option<f64>,
    pub projected_date: Option<DateTime<Utc>>,
    pub user_target_date: Option<DateTime<Utc>>,
    pub confidence: Option<f64>,
    /// Days since the goal started
    pub elapsed_days: i64,
    pub target_value: f64,
    pub unit: &'a str,
}

/// Outcome of the trend fit, as far as messaging is concerned
enum TrendMessage {
    /// No model could be fit
    Missing,
    /// Model fit, but not progressing
    Flat,
    Rising(String),
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Generates guidance strings, in a fixed order, capped by configuration
pub struct RecommendationEngine<'a> {
    config: &'a RecommendationConfig,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(config: &'a RecommendationConfig) -> Self {
        Self { config }
    }

    /// Monthly growth as a percentage of the starting value
    pub fn monthly_growth_percentage(slope_per_day: f64, first_value: f64) -> f64 {
        let base = if first_value == 0.0 { 1.0 } else { first_value };
        slope_per_day * DAYS_PER_MONTH / base * 100.0
    }

    pub fn for_performance(&self, signals: &PerformanceSignals<'_>) -> Vec<String> {
        let trend = match signals.slope_per_day {
            None => TrendMessage::Missing,
            Some(slope) if slope > 0.0 => TrendMessage::Rising(format!(
                "Your {} estimated 1RM is improving by about {:.1}% per month.",
                signals.metric_label,
                Self::monthly_growth_percentage(slope, signals.first_value)
            )),
            Some(_) => TrendMessage::Flat,
        };

        self.assemble(trend, Some(signals.confidence), signals.elapsed_days)
    }

    pub fn for_goal(&self, signals: &GoalSignals<'_>) -> Vec<String> {
        let trend = match signals.growth_coefficient {
            None => TrendMessage::Missing,
            Some(b) if b > 0.0 => TrendMessage::Rising(self.goal_timeline_message(signals)),
            Some(_) => TrendMessage::Flat,
        };

        self.assemble(trend, signals.confidence, signals.elapsed_days)
    }

    fn goal_timeline_message(&self, signals: &GoalSignals<'_>) -> String {
        let target = format!("{} {}", signals.target_value, signals.unit);
        match (signals.projected_date, signals.user_target_date) {
            (Some(projected), Some(deadline)) if projected <= deadline => format!(
                "On track: projected to reach {} by {}, ahead of your {} target date.",
                target,
                format_date(projected),
                format_date(deadline)
            ),
            (Some(projected), Some(deadline)) => format!(
                "Off track: at the current rate you'll reach {} around {}, after your {} target date. Consider adding volume or frequency.",
                target,
                format_date(projected),
                format_date(deadline)
            ),
            (Some(projected), None) => format!(
                "At your current rate you should reach {} around {}.",
                target,
                format_date(projected)
            ),
            (None, _) => format!(
                "You're trending upward, but a date for reaching {} can't be estimated yet.",
                target
            ),
        }
    }

    fn assemble(
        &self,
        trend: TrendMessage,
        confidence: Option<f64>,
        elapsed_days: i64,
    ) -> Vec<String> {
        let mut out = vec![messages::STAY_CONSISTENT.to_string()];

        match trend {
            TrendMessage::Missing => out.push(messages::NOT_ENOUGH_DATA.to_string()),
            TrendMessage::Rising(message) => out.push(message),
            TrendMessage::Flat if elapsed_days > self.config.min_elapsed_days => {
                out.push(messages::PROGRESS_STALLED.to_string());
            }
            TrendMessage::Flat => {}
        }

        if let Some(confidence) = confidence {
            if confidence > self.config.consistent_confidence {
                out.push(messages::QUITE_CONSISTENT.to_string());
            } else if confidence < self.config.inconsistent_confidence
                && elapsed_days >= self.config.min_elapsed_days
            {
                out.push(messages::INCONSISTENT.to_string());
            }
        }

        out.truncate(self.config.max_entries);
        out
    }
}
