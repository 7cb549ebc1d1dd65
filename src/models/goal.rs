//! Personal fitness goals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    MuscleGain,
    Endurance,
    Strength,
    Flexibility,
    GeneralFitness,
}

/// A goal owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessGoal {
    pub id: u64,
    pub user_id: u64,
    pub goal_type: GoalType,
    pub description: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub target_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_achieved: bool,
    pub created_at: String,
}

impl FitnessGoal {
    pub fn progress_percentage(&self) -> f64 {
        match self.target_value {
            Some(target) if target > 0.0 => (self.current_value / target * 100.0).min(100.0),
            _ => 0.0,
        }
    }

    pub fn mark_achieved(&mut self) {
        self.is_achieved = true;
        self.is_active = false;
    }
}
