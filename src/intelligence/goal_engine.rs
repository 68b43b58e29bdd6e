// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Goal tracking: projection, milestones and progress for a strength goal

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::confidence::goal_confidence;
use super::curve_fitting::{fit_logarithmic, ModelParameters};
use super::milestones::build_milestones;
use super::observations::{extract_series, ExtractionWindow};
use super::projection::project_date;
use super::recommendation_engine::{GoalSignals, RecommendationEngine};
use super::EnrichedGoal;
use crate::config::ForecastConfig;
use crate::models::{Goal, SessionRecord};

/// Trait for evaluating goals against training history
pub trait GoalTracker {
    /// Evaluate `goal` against `history` as of `now`.
    ///
    /// Always returns. When no model can be fit the projected date and the
    /// confidence are `None` and the recommendations say so.
    fn process_goal(
        &self,
        goal: &Goal,
        history: &[SessionRecord],
        now: DateTime<Utc>,
    ) -> (EnrichedGoal, Vec<String>);
}

/// Logarithmic goal engine
#[derive(Debug, Clone, Default)]
pub struct GoalEngine {
    config: ForecastConfig,
}

impl GoalEngine {
    /// Create a goal engine with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a goal engine with the given configuration
    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Progress from start to target, 0-100, one decimal
    fn progress_percentage(goal: &Goal, current_value: f64) -> f64 {
        let mut range = goal.target_value - goal.start_value;
        if range == 0.0 {
            range = 1.0;
        }
        let pct = ((current_value - goal.start_value) / range * 100.0).clamp(0.0, 100.0);
        (pct * 10.0).round() / 10.0
    }
}

impl GoalTracker for GoalEngine {
    fn process_goal(
        &self,
        goal: &Goal,
        history: &[SessionRecord],
        now: DateTime<Utc>,
    ) -> (EnrichedGoal, Vec<String>) {
        let window = ExtractionWindow::new(now).with_origin(goal.start_date);
        let series = goal
            .exercise_reference
            .as_deref()
            .and_then(|metric_id| extract_series(metric_id, history, &window));

        let model = series
            .as_ref()
            .and_then(|series| fit_logarithmic(&series.fit_points()));
        let confidence = model.as_ref().map(goal_confidence);
        let projected_date = model
            .as_ref()
            .and_then(|model| project_date(model, goal.target_value, goal.start_date));
        let growth_coefficient = model.as_ref().and_then(|model| match model.parameters {
            ModelParameters::Logarithmic { b, .. } => Some(b),
            _ => None,
        });

        if model.is_none() {
            debug!(
                goal.id = %goal.id,
                observations = series.as_ref().map_or(0, |s| s.len()),
                "No logarithmic model for goal"
            );
        }

        let milestones = build_milestones(goal, projected_date, series.as_ref(), &self.config.goals);
        let milestones_achieved = milestones.iter().filter(|m| m.is_achieved()).count();

        let current_value = series
            .as_ref()
            .and_then(|series| series.last())
            .map_or(goal.start_value, |o| o.value);

        let on_track = match (projected_date, goal.user_target_date) {
            (Some(projected), Some(deadline)) => Some(projected <= deadline),
            _ => None,
        };

        let recommendations = RecommendationEngine::new(&self.config.recommendations).for_goal(
            &GoalSignals {
                growth_coefficient,
                projected_date,
                user_target_date: goal.user_target_date,
                confidence,
                elapsed_days: (now - goal.start_date).num_days().max(0),
                target_value: goal.target_value,
                unit: &goal.unit,
            },
        );

        let mut enriched_goal = goal.clone();
        enriched_goal.milestones = milestones;

        let enriched = EnrichedGoal {
            progress_percentage: Self::progress_percentage(goal, current_value),
            goal: enriched_goal,
            current_value,
            projected_date,
            confidence,
            on_track,
            milestones_achieved,
        };

        info!(
            goal.id = %goal.id,
            goal.title = %goal.title,
            progress = enriched.progress_percentage,
            confidence = ?enriched.confidence,
            projected = ?enriched.projected_date,
            milestones_achieved,
            "Goal evaluation complete"
        );

        (enriched, recommendations)
    }
}
