// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Input records consumed by the forecasting engines. The surrounding
//! application owns persistence; everything here is a plain value that the
//! caller hands over as a read-only snapshot.
//!
//! ## Core Models
//!
//! - [`SessionRecord`]: one training session with per-metric sets
//! - [`SetEntry`]: a single `(weight, reps)` set
//! - [`Goal`]: a strength target with its owned [`Milestone`] list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single working set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Load lifted, in the caller's unit
    pub weight: f64,
    /// Completed repetitions
    pub reps: u32,
}

impl SetEntry {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }
}

/// All sets recorded for one tracked exercise/metric within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Identifier of the tracked exercise (e.g. `"bench_press"`)
    pub metric_id: String,
    /// Sets performed, in any order
    pub sets: Vec<SetEntry>,
}

/// A training session as stored by the host application
///
/// # Examples
///
/// ```rust
/// use liftcast::models::{SessionRecord, SetEntry};
/// use chrono::Utc;
///
/// let session = SessionRecord::new(Utc::now())
///     .with_metric("squat", vec![SetEntry::new(140.0, 5), SetEntry::new(150.0, 3)]);
///
/// assert!(session.sets_for("squat").is_some());
/// assert!(session.sets_for("deadlift").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Per-metric measurements
    #[serde(default)]
    pub metrics: Vec<MetricEntry>,
}

impl SessionRecord {
    /// Create an empty session on the given date
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            metrics: Vec::new(),
        }
    }

    /// Builder-style helper to attach a metric's sets
    pub fn with_metric(mut self, metric_id: &str, sets: Vec<SetEntry>) -> Self {
        self.metrics.push(MetricEntry {
            metric_id: metric_id.to_string(),
            sets,
        });
        self
    }

    /// Sets recorded for `metric_id`, if the session tracked it at all
    pub fn sets_for(&self, metric_id: &str) -> Option<&[SetEntry]> {
        self.metrics
            .iter()
            .find(|m| m.metric_id == metric_id)
            .map(|m| m.sets.as_slice())
    }
}

/// Strength goal definition
///
/// The caller owns goals; the goal engine reads them and hands back an
/// enriched copy with a normalised milestone list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Generated when absent from the input
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    /// Value at the time the goal was set
    pub start_value: f64,
    /// Value to reach
    pub target_value: f64,
    pub start_date: DateTime<Utc>,
    /// Deadline chosen by the user, if any
    #[serde(default)]
    pub user_target_date: Option<DateTime<Utc>>,
    /// Display unit (e.g. "lb", "kg")
    pub unit: String,
    /// Metric tracked by this goal; goals without one cannot be projected
    #[serde(default)]
    pub exercise_reference: Option<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Goal {
    /// Create a goal with no milestones and no deadline
    pub fn new(
        title: &str,
        start_value: f64,
        target_value: f64,
        start_date: DateTime<Utc>,
        unit: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            start_value,
            target_value,
            start_date,
            user_target_date: None,
            unit: unit.to_string(),
            exercise_reference: None,
            milestones: Vec::new(),
        }
    }

    /// Attach the metric this goal tracks
    pub fn for_exercise(mut self, metric_id: &str) -> Self {
        self.exercise_reference = Some(metric_id.to_string());
        self
    }

    /// Set a user-chosen deadline
    pub fn with_target_date(mut self, date: DateTime<Utc>) -> Self {
        self.user_target_date = Some(date);
        self
    }
}

/// Waypoint between a goal's start and target values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub value: f64,
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub achieved_date: Option<DateTime<Utc>>,
}

impl Milestone {
    pub fn new(value: f64, target_date: DateTime<Utc>) -> Self {
        Self {
            value,
            target_date,
            achieved_date: None,
        }
    }

    pub fn is_achieved(&self) -> bool {
        self.achieved_date.is_some()
    }
}
