// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged activity model and the points formula.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of workout. The set is fixed; anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Running,
    Walking,
    Cycling,
    Swimming,
    Strength,
    Sports,
    Yoga,
    Dance,
    Hiking,
    Other,
}

impl ActivityType {
    pub const ALL: [ActivityType; 10] = [
        ActivityType::Running,
        ActivityType::Walking,
        ActivityType::Cycling,
        ActivityType::Swimming,
        ActivityType::Strength,
        ActivityType::Sports,
        ActivityType::Yoga,
        ActivityType::Dance,
        ActivityType::Hiking,
        ActivityType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Walking => "Walking",
            ActivityType::Cycling => "Cycling",
            ActivityType::Swimming => "Swimming",
            ActivityType::Strength => "Strength",
            ActivityType::Sports => "Sports",
            ActivityType::Yoga => "Yoga",
            ActivityType::Dance => "Dance",
            ActivityType::Hiking => "Hiking",
            ActivityType::Other => "Other",
        }
    }
}

/// Perceived effort of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Intensity {
    Light,
    Moderate,
    Vigorous,
    #[serde(rename = "Very Vigorous")]
    VeryVigorous,
}

impl Intensity {
    /// Points earned per minute at this intensity.
    pub fn multiplier(&self) -> f64 {
        match self {
            Intensity::Light => 1.0,
            Intensity::Moderate => 1.5,
            Intensity::Vigorous => 2.0,
            Intensity::VeryVigorous => 2.5,
        }
    }
}

/// Points for an activity: duration times the intensity multiplier,
/// rounded half away from zero.
pub fn calculate_points(duration_minutes: u32, intensity: Intensity) -> u32 {
    (f64::from(duration_minutes) * intensity.multiplier()).round() as u32
}

/// Stored activity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Store-wide activity ID
    pub id: u64,
    /// Owning user ID
    pub user_id: u64,
    pub name: String,
    pub activity_type: ActivityType,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    /// Always `calculate_points(duration_minutes, intensity)`
    pub points: u32,
    /// Day the activity took place
    pub date: NaiveDate,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
    /// When the activity was submitted (RFC3339)
    pub logged_at: String,
}

/// Activity as sent to clients, using the web client's field names.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration: u32,
    pub intensity: Intensity,
    pub points: u32,
    pub date: NaiveDate,
    pub distance: Option<f64>,
    pub notes: Option<String>,
    pub logged_at: String,
}

impl From<Activity> for ActivityResponse {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            name: a.name,
            activity_type: a.activity_type,
            duration: a.duration_minutes,
            intensity: a.intensity,
            points: a.points,
            date: a.date,
            distance: a.distance_km,
            notes: a.notes,
            logged_at: a.logged_at,
        }
    }
}

/// Running totals over a list of activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityTotals {
    pub count: u32,
    pub total_minutes: u32,
    pub total_points: u32,
    /// Sum of distances (km), rounded to one decimal
    pub total_distance_km: f64,
}

impl ActivityTotals {
    pub fn from_activities<'a, I>(activities: I) -> Self
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let mut totals = Self::default();
        let mut distance = 0.0;
        for activity in activities {
            totals.count += 1;
            totals.total_minutes += activity.duration_minutes;
            totals.total_points += activity.points;
            if let Some(km) = activity.distance_km {
                distance += km;
            }
        }
        totals.total_distance_km = round_to(distance, 1);
        totals
    }
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(id: u64, minutes: u32, intensity: Intensity, km: Option<f64>) -> Activity {
        Activity {
            id,
            user_id: 1,
            name: format!("Activity {}", id),
            activity_type: ActivityType::Running,
            duration_minutes: minutes,
            intensity,
            points: calculate_points(minutes, intensity),
            date: NaiveDate::from_ymd_opt(2024, 8, 21).unwrap(),
            distance_km: km,
            notes: None,
            logged_at: "2024-08-21T07:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_points_per_intensity() {
        assert_eq!(calculate_points(30, Intensity::Light), 30);
        assert_eq!(calculate_points(30, Intensity::Moderate), 45);
        assert_eq!(calculate_points(45, Intensity::Vigorous), 90);
        assert_eq!(calculate_points(60, Intensity::VeryVigorous), 150);
    }

    #[test]
    fn test_points_round_half_up() {
        // 25 * 1.5 = 37.5
        assert_eq!(calculate_points(25, Intensity::Moderate), 38);
        // 3 * 2.5 = 7.5
        assert_eq!(calculate_points(3, Intensity::VeryVigorous), 8);
    }

    #[test]
    fn test_intensity_serde_names() {
        let json = serde_json::to_string(&Intensity::VeryVigorous).unwrap();
        assert_eq!(json, "\"Very Vigorous\"");
        let parsed: Intensity = serde_json::from_str("\"Moderate\"").unwrap();
        assert_eq!(parsed, Intensity::Moderate);
    }

    #[test]
    fn test_totals_skip_missing_distance() {
        let activities = vec![
            make_activity(1, 30, Intensity::Moderate, Some(5.2)),
            make_activity(2, 45, Intensity::Vigorous, None),
            make_activity(3, 60, Intensity::Vigorous, Some(2.3)),
        ];

        let totals = ActivityTotals::from_activities(&activities);

        assert_eq!(totals.count, 3);
        assert_eq!(totals.total_minutes, 135);
        assert_eq!(totals.total_points, 45 + 90 + 120);
        assert_eq!(totals.total_distance_km, 7.5);
    }

    #[test]
    fn test_totals_empty() {
        let none: Vec<Activity> = Vec::new();
        let totals = ActivityTotals::from_activities(&none);
        assert_eq!(totals, ActivityTotals::default());
    }
}
