//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::activity::round_to;

/// School grade of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum GradeLevel {
    #[serde(rename = "9")]
    Ninth,
    #[serde(rename = "10")]
    Tenth,
    #[serde(rename = "11")]
    Eleventh,
    #[serde(rename = "12")]
    Twelfth,
}

/// User profile held in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-wide user ID
    pub id: u64,
    /// Login name (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub grade_level: Option<GradeLevel>,
    /// Height in centimeters
    pub height_cm: Option<u32>,
    /// Weight in kilograms
    pub weight_kg: Option<u32>,
    /// Free-text goals
    pub fitness_goals: String,
    /// Free-text, comma-separated list of preferred activities
    pub preferred_activities: String,
    /// Points earned before this store existed (seed history)
    pub carried_points: u32,
    /// When the user registered (RFC3339)
    pub created_at: String,
    /// Last profile update (RFC3339)
    pub updated_at: String,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn bmi(&self) -> Option<f64> {
        bmi(self.height_cm, self.weight_kg)
    }
}

/// Body mass index rounded to one decimal, when both height and weight are known.
pub fn bmi(height_cm: Option<u32>, weight_kg: Option<u32>) -> Option<f64> {
    match (height_cm, weight_kg) {
        (Some(h), Some(w)) if h > 0 && w > 0 => {
            let height_m = f64::from(h) / 100.0;
            Some(round_to(f64::from(w) / (height_m * height_m), 1))
        }
        _ => None,
    }
}

/// Stored login credentials, keyed by lowercased username.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: u64,
    /// Hex-encoded PBKDF2 salt
    pub salt: String,
    /// Hex-encoded PBKDF2 hash
    pub password_hash: String,
}
