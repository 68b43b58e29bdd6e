// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Liftcast
//!
//! A performance-forecasting engine for strength training. Liftcast turns a
//! lifter's session history into quantified predictions: projected dates for
//! reaching a goal, a confidence score for the projection, rep-range specific
//! strength forecasts, and training recommendations.
//!
//! ## Features
//!
//! - **1RM estimation**: Brzycki estimates from the best set of each session
//! - **Curve fitting**: Linear trends, logarithmic goal curves and a
//!   limiting-returns model for performance projection
//! - **Confidence scoring**: Bounded trust scores that degrade with sparse,
//!   noisy or far-extrapolated data
//! - **Milestones**: Ordered waypoints between a goal's start and target,
//!   marked achieved from history
//! - **Recommendations**: Short rule-based guidance
//!
//! ## Architecture
//!
//! - **Models**: Session records, goals and milestones
//! - **Intelligence**: The forecasting engines
//! - **Config**: Tunable forecasting parameters loaded from TOML
//! - **Logging**: Structured `tracing` output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use liftcast::intelligence::{PerformanceAnalyzer, PerformancePredictor};
//! use liftcast::models::{SessionRecord, SetEntry};
//!
//! let history = vec![SessionRecord::new(Utc::now())
//!     .with_metric("bench", vec![SetEntry::new(135.0, 10)])];
//!
//! let analyzer = PerformanceAnalyzer::new();
//! if let Some(prediction) =
//!     analyzer.predict_performance("bench", "Bench Press", &history, None, Utc::now())
//! {
//!     println!("Predicted 1RM: {}", prediction.predicted_value);
//! }
//! ```

/// Common data models for training history and goals
pub mod models;

/// Configuration management
pub mod config;

/// Forecasting constants
pub mod constants;

/// Forecasting engines
pub mod intelligence;

/// Structured logging setup
pub mod logging;
