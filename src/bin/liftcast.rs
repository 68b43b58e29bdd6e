// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use liftcast::config::ForecastConfig;
use liftcast::intelligence::{GoalEngine, GoalTracker, PerformanceAnalyzer, PerformancePredictor};
use liftcast::logging;
use liftcast::models::{Goal, SessionRecord};

#[derive(Parser)]
#[command(name = "liftcast")]
#[command(about = "Forecast strength performance and goal timelines from training history")]
#[command(version)]
struct Cli {
    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a metric's estimated 1RM at the configured horizon
    Predict {
        /// Path to a JSON array of session records
        #[arg(long)]
        history: String,

        /// Metric (exercise) identifier
        #[arg(long)]
        metric: String,

        /// Display label (defaults to the metric identifier)
        #[arg(long)]
        label: Option<String>,

        /// Only use sessions from the last N months
        #[arg(long)]
        lookback_months: Option<u32>,

        /// Reference time as RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Path to a forecast configuration file
        #[arg(long)]
        config: Option<String>,
    },
    /// Evaluate a goal against training history
    Goal {
        /// Path to a JSON goal
        #[arg(long)]
        goal: String,

        /// Path to a JSON array of session records
        #[arg(long)]
        history: String,

        /// Reference time as RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Path to a forecast configuration file
        #[arg(long)]
        config: Option<String>,
    },
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path))
}

fn reference_time(now: Option<String>) -> Result<DateTime<Utc>> {
    match now {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(&raw)
            .with_context(|| format!("Invalid --now timestamp: {}", raw))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init_for_cli(cli.verbose)?;

    let output = match cli.command {
        Commands::Predict {
            history,
            metric,
            label,
            lookback_months,
            now,
            config,
        } => {
            let config = ForecastConfig::load(config)?;
            let records: Vec<SessionRecord> = read_json(&history)?;
            let now = reference_time(now)?;
            let label = label.unwrap_or_else(|| metric.clone());

            info!(metric.id = %metric, sessions = records.len(), "Running performance prediction");

            let analyzer = PerformanceAnalyzer::with_config(config);
            match analyzer.predict_performance(&metric, &label, &records, lookback_months, now) {
                Some(prediction) => serde_json::to_value(&prediction)?,
                None => json!({
                    "metric_id": metric,
                    "prediction": null,
                    "message": "No qualifying observations for this metric"
                }),
            }
        }
        Commands::Goal {
            goal,
            history,
            now,
            config,
        } => {
            let config = ForecastConfig::load(config)?;
            let goal: Goal = read_json(&goal)?;
            let records: Vec<SessionRecord> = read_json(&history)?;
            let now = reference_time(now)?;

            info!(goal.id = %goal.id, sessions = records.len(), "Running goal evaluation");

            let engine = GoalEngine::with_config(config);
            let (enriched, recommendations) = engine.process_goal(&goal, &records, now);
            json!({
                "goal": enriched,
                "recommendations": recommendations,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
