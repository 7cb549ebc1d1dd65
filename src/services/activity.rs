// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging service.
//!
//! Handles the activity log workflow:
//! 1. Validate the submitted form
//! 2. Compute points from duration and intensity
//! 3. Store the activity under its owner
//! 4. Serve filtered, paginated listings and the derived totals

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::{
    calculate_points, Activity, ActivitySummary, ActivityTotals, ActivityType, Intensity,
};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

/// Activity log form. Field aliases accept the names the web client uses.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewActivity {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(alias = "type")]
    pub activity_type: ActivityType,
    #[serde(alias = "duration")]
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: u32,
    pub intensity: Intensity,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "distance")]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub distance_km: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Position in a newest-first activity listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityCursor {
    pub date: NaiveDate,
    pub activity_id: u64,
}

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub activity_type: Option<ActivityType>,
    /// Inclusive lower date bound
    pub after: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub before: Option<NaiveDate>,
    /// Continue after this position
    pub cursor: Option<ActivityCursor>,
    pub limit: usize,
}

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct ActivityPage {
    pub activities: Vec<Activity>,
    /// Present when more activities follow
    pub next_cursor: Option<ActivityCursor>,
}

impl NewActivity {
    /// Validate the form and return the trimmed name.
    fn checked_name(&self) -> Result<String> {
        self.validate()?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Activity name must not be blank".to_string(),
            ));
        }
        Ok(name.to_string())
    }

    fn trimmed_notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
    }
}

/// Newest first: date descending, then ID descending.
fn newest_first(a: &Activity, b: &Activity) -> std::cmp::Ordering {
    b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id))
}

#[derive(Clone)]
pub struct ActivityService {
    db: MemoryDb,
}

impl ActivityService {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    /// Log an activity for a user. Points are always computed here.
    pub fn log_activity(
        &self,
        user_id: u64,
        new_activity: NewActivity,
        now: DateTime<Utc>,
    ) -> Result<Activity> {
        let name = new_activity.checked_name()?;

        if self.db.get_user(user_id).is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let points = calculate_points(new_activity.duration_minutes, new_activity.intensity);
        let activity = Activity {
            id: self.db.next_id(),
            user_id,
            name,
            activity_type: new_activity.activity_type,
            duration_minutes: new_activity.duration_minutes,
            intensity: new_activity.intensity,
            points,
            date: new_activity.date.unwrap_or_else(|| now.date_naive()),
            distance_km: new_activity.distance_km,
            notes: new_activity.trimmed_notes(),
            logged_at: format_utc_rfc3339(now),
        };

        tracing::info!(
            user_id,
            activity_id = activity.id,
            activity_type = activity.activity_type.as_str(),
            duration = activity.duration_minutes,
            points,
            "Activity logged"
        );

        self.db.insert_activity(activity.clone());
        Ok(activity)
    }

    /// Replace the details of one of the user's own activities.
    ///
    /// Points are recomputed; the ID and submission time are kept, and so
    /// is the date when the form leaves it out. Activities owned by someone
    /// else are reported as not found.
    pub fn update_activity(
        &self,
        user_id: u64,
        activity_id: u64,
        changes: NewActivity,
    ) -> Result<Activity> {
        let name = changes.checked_name()?;
        let notes = changes.trimmed_notes();
        let points = calculate_points(changes.duration_minutes, changes.intensity);

        let activity = self.db.update_activity(user_id, activity_id, |activity| {
            activity.name = name;
            activity.activity_type = changes.activity_type;
            activity.duration_minutes = changes.duration_minutes;
            activity.intensity = changes.intensity;
            activity.points = points;
            if let Some(date) = changes.date {
                activity.date = date;
            }
            activity.distance_km = changes.distance_km;
            activity.notes = notes;
        })?;

        tracing::info!(user_id, activity_id, points, "Activity updated");
        Ok(activity)
    }

    /// List a user's activities newest first.
    pub fn list_activities(&self, user_id: u64, filter: &ActivityFilter) -> ActivityPage {
        let mut activities: Vec<Activity> = self
            .db
            .activities_for_user(user_id)
            .into_iter()
            .filter(|a| filter.activity_type.is_none_or(|t| a.activity_type == t))
            .filter(|a| filter.after.is_none_or(|d| a.date >= d))
            .filter(|a| filter.before.is_none_or(|d| a.date <= d))
            .filter(|a| {
                filter
                    .cursor
                    .is_none_or(|c| (a.date, a.id) < (c.date, c.activity_id))
            })
            .collect();
        activities.sort_by(newest_first);

        let limit = filter.limit.max(1);
        let next_cursor = if activities.len() > limit {
            activities.truncate(limit);
            activities.last().map(|a| ActivityCursor {
                date: a.date,
                activity_id: a.id,
            })
        } else {
            None
        };

        ActivityPage {
            activities,
            next_cursor,
        }
    }

    /// The `limit` most recent activities of a user.
    pub fn recent_activities(&self, user_id: u64, limit: usize) -> Vec<Activity> {
        let mut activities = self.db.activities_for_user(user_id);
        activities.sort_by(newest_first);
        activities.truncate(limit);
        activities
    }

    pub fn totals(&self, user_id: u64) -> ActivityTotals {
        ActivityTotals::from_activities(&self.db.activities_for_user(user_id))
    }

    pub fn summary(&self, user_id: u64, today: NaiveDate) -> ActivitySummary {
        ActivitySummary::new(&self.db.activities_for_user(user_id), today)
    }

    /// Delete one of the user's own activities.
    ///
    /// Activities owned by someone else are reported as not found.
    pub fn delete_activity(&self, user_id: u64, activity_id: u64) -> Result<Activity> {
        let removed = self
            .db
            .remove_activity(user_id, activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        tracing::info!(user_id, activity_id, points = removed.points, "Activity deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AuthService;
    use chrono::Duration;

    fn setup() -> (ActivityService, u64, DateTime<Utc>) {
        let db = MemoryDb::new();
        let now = DateTime::from_timestamp(1_724_223_600, 0).unwrap(); // 2024-08-21
        let user = AuthService::new(db.clone(), true)
            .ensure_demo_user(now)
            .unwrap();
        (ActivityService::new(db), user.id, now)
    }

    fn form(name: &str, minutes: u32, intensity: Intensity, date: Option<NaiveDate>) -> NewActivity {
        NewActivity {
            name: name.to_string(),
            activity_type: ActivityType::Running,
            duration_minutes: minutes,
            intensity,
            date,
            distance_km: None,
            notes: None,
        }
    }

    #[test]
    fn test_log_activity_computes_points() {
        let (service, user_id, now) = setup();
        let activity = service
            .log_activity(user_id, form("Morning Run", 30, Intensity::Moderate, None), now)
            .unwrap();

        assert_eq!(activity.points, 45);
        assert_eq!(activity.date, now.date_naive());
        assert_eq!(activity.logged_at, "2024-08-21T07:00:00Z");
        assert_eq!(service.totals(user_id).total_points, 45);
    }

    #[test]
    fn test_log_activity_rejects_bad_duration() {
        let (service, user_id, now) = setup();

        let zero = form("Nap", 0, Intensity::Light, None);
        assert!(matches!(
            service.log_activity(user_id, zero, now),
            Err(AppError::BadRequest(_))
        ));

        let too_long = form("Ultra", 601, Intensity::Light, None);
        assert!(matches!(
            service.log_activity(user_id, too_long, now),
            Err(AppError::BadRequest(_))
        ));

        let blank = form("   ", 30, Intensity::Light, None);
        assert!(matches!(
            service.log_activity(user_id, blank, now),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_log_activity_unknown_user() {
        let (service, _, now) = setup();
        let err = service
            .log_activity(999, form("Run", 30, Intensity::Light, None), now)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_listing_pages_newest_first() {
        let (service, user_id, now) = setup();
        let today = now.date_naive();
        for days_ago in 0..5 {
            service
                .log_activity(
                    user_id,
                    form(
                        &format!("Run {}", days_ago),
                        30,
                        Intensity::Light,
                        Some(today - Duration::days(days_ago)),
                    ),
                    now,
                )
                .unwrap();
        }

        let mut filter = ActivityFilter {
            limit: 2,
            ..Default::default()
        };
        let first = service.list_activities(user_id, &filter);
        assert_eq!(
            first.activities.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            vec!["Run 0", "Run 1"]
        );

        filter.cursor = first.next_cursor;
        let second = service.list_activities(user_id, &filter);
        assert_eq!(second.activities[0].name, "Run 2");

        filter.cursor = second.next_cursor;
        let last = service.list_activities(user_id, &filter);
        assert_eq!(last.activities.len(), 1);
        assert!(last.next_cursor.is_none());
    }

    #[test]
    fn test_listing_filters() {
        let (service, user_id, now) = setup();
        let today = now.date_naive();
        service
            .log_activity(user_id, form("Old", 30, Intensity::Light, Some(today - Duration::days(30))), now)
            .unwrap();
        let mut yoga = form("Stretch", 20, Intensity::Light, Some(today));
        yoga.activity_type = ActivityType::Yoga;
        service.log_activity(user_id, yoga, now).unwrap();

        let recent = service.list_activities(
            user_id,
            &ActivityFilter {
                after: Some(today - Duration::days(7)),
                limit: 50,
                ..Default::default()
            },
        );
        assert_eq!(recent.activities.len(), 1);

        let running = service.list_activities(
            user_id,
            &ActivityFilter {
                activity_type: Some(ActivityType::Running),
                limit: 50,
                ..Default::default()
            },
        );
        assert_eq!(running.activities[0].name, "Old");
    }

    #[test]
    fn test_update_activity_recomputes_points() {
        let (service, user_id, now) = setup();
        let logged = service
            .log_activity(user_id, form("Jog", 30, Intensity::Light, Some(now.date_naive())), now)
            .unwrap();
        assert_eq!(logged.points, 30);

        let mut changes = form("Tempo Run", 40, Intensity::VeryVigorous, None);
        changes.notes = Some("  felt strong ".to_string());
        let updated = service.update_activity(user_id, logged.id, changes).unwrap();

        assert_eq!(updated.id, logged.id);
        assert_eq!(updated.name, "Tempo Run");
        assert_eq!(updated.points, 100);
        assert_eq!(updated.notes.as_deref(), Some("felt strong"));
        // Date and submission time are kept
        assert_eq!(updated.date, logged.date);
        assert_eq!(updated.logged_at, logged.logged_at);
        assert_eq!(service.totals(user_id).total_points, 100);
    }

    #[test]
    fn test_update_only_own_activity() {
        let (service, user_id, now) = setup();
        let activity = service
            .log_activity(user_id, form("Run", 30, Intensity::Light, None), now)
            .unwrap();

        assert!(matches!(
            service.update_activity(
                user_id + 100,
                activity.id,
                form("Hijack", 600, Intensity::VeryVigorous, None)
            ),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update_activity(user_id, activity.id, form("Run", 0, Intensity::Light, None)),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(service.totals(user_id).total_points, 30);
    }

    #[test]
    fn test_delete_only_own_activity() {
        let (service, user_id, now) = setup();
        let activity = service
            .log_activity(user_id, form("Run", 30, Intensity::Light, None), now)
            .unwrap();

        assert!(matches!(
            service.delete_activity(user_id + 100, activity.id),
            Err(AppError::NotFound(_))
        ));

        service.delete_activity(user_id, activity.id).unwrap();
        assert_eq!(service.totals(user_id).count, 0);
    }
}
