//! Aggregates derived from a user's activities.
//!
//! These are computed on request by linear scans over the user's
//! activities; nothing here is cached.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::activity::{round_to, Activity, ActivityTotals};

/// Length of the rolling "this week" window in days.
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// First day counted as "this week" relative to `today`.
pub fn week_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WEEK_WINDOW_DAYS)
}

/// Activities inside the rolling weekly window.
pub fn this_week<'a>(
    activities: &'a [Activity],
    today: NaiveDate,
) -> impl Iterator<Item = &'a Activity> + 'a {
    let start = week_window_start(today);
    activities.iter().filter(move |a| a.date >= start)
}

/// Activity summary for the activity log header.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummary {
    #[serde(flatten)]
    pub totals: ActivityTotals,
    /// Mean intensity multiplier, two decimals
    pub average_intensity: f64,
    /// Activity type logged most often, "None" when nothing is logged
    pub most_common_activity: String,
    pub this_week_activities: u32,
    pub this_week_points: u32,
}

impl ActivitySummary {
    pub fn new(activities: &[Activity], today: NaiveDate) -> Self {
        let totals = ActivityTotals::from_activities(activities);

        let average_intensity = if activities.is_empty() {
            0.0
        } else {
            let sum: f64 = activities.iter().map(|a| a.intensity.multiplier()).sum();
            round_to(sum / activities.len() as f64, 2)
        };

        let mut counts: HashMap<&'static str, u32> = HashMap::new();
        for activity in activities {
            *counts.entry(activity.activity_type.as_str()).or_insert(0) += 1;
        }
        // Highest count wins; ties go to the alphabetically first name.
        let most_common_activity = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "None".to_string());

        let week = ActivityTotals::from_activities(this_week(activities, today));

        Self {
            totals,
            average_intensity,
            most_common_activity,
            this_week_activities: week.count,
            this_week_points: week.total_points,
        }
    }
}

/// Progress toward one weekly goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalProgress {
    pub current: u32,
    pub goal: u32,
    /// Percentage of the goal reached, capped at 100
    pub percentage: f64,
}

impl GoalProgress {
    pub fn new(current: u32, goal: u32) -> Self {
        let percentage = if goal == 0 {
            100.0
        } else {
            round_to((f64::from(current) / f64::from(goal) * 100.0).min(100.0), 1)
        };
        Self {
            current,
            goal,
            percentage,
        }
    }
}
