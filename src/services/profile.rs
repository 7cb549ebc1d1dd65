// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile editing, per-user statistics and fitness goals.

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::{FitnessGoal, GoalType, GradeLevel, User};
use crate::services::auth::{is_demo_email, DEMO_USERNAME};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub grade_level: Option<GradeLevel>,
    #[validate(range(min = 100, max = 250))]
    pub height_cm: Option<u32>,
    #[validate(range(min = 30, max = 200))]
    pub weight_kg: Option<u32>,
    #[validate(length(max = 2000))]
    pub fitness_goals: Option<String>,
    #[validate(length(max = 500))]
    pub preferred_activities: Option<String>,
}

/// Profile as returned to its owner.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Profile {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub grade_level: Option<GradeLevel>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub bmi: Option<f64>,
    pub fitness_goals: String,
    pub preferred_activities: String,
    pub total_points: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Profile {
    fn new(user: User, total_points: u32) -> Self {
        Self {
            display_name: user.display_name(),
            bmi: user.bmi(),
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            grade_level: user.grade_level,
            height_cm: user.height_cm,
            weight_kg: user.weight_kg,
            fitness_goals: user.fitness_goals,
            preferred_activities: user.preferred_activities,
            total_points,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    pub total_points: u32,
    pub total_activities: u32,
    pub bmi: Option<f64>,
    pub active_goals: u32,
    pub achieved_goals: u32,
}

/// Goal creation form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewGoal {
    pub goal_type: GoalType,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub target_value: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub current_value: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ProfileService {
    db: MemoryDb,
    demo_login_enabled: bool,
}

impl ProfileService {
    pub fn new(db: MemoryDb, demo_login_enabled: bool) -> Self {
        Self {
            db,
            demo_login_enabled,
        }
    }

    fn user(&self, user_id: u64) -> Result<User> {
        self.db
            .get_user(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    pub fn get_profile(&self, user_id: u64) -> Result<Profile> {
        let user = self.user(user_id)?;
        Ok(Profile::new(user, self.db.user_points(user_id)))
    }

    /// Apply a partial update and return the stored profile.
    pub fn update_profile(
        &self,
        user_id: u64,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Profile> {
        update.validate()?;
        let demo_login_enabled = self.demo_login_enabled;

        let user = self.db.update_user(user_id, |user| {
            if let Some(email) = update.email {
                let email = email.trim();
                // Reserved for the demo student
                if demo_login_enabled
                    && is_demo_email(email)
                    && !user.username.eq_ignore_ascii_case(DEMO_USERNAME)
                {
                    return Err(AppError::Conflict(format!("Email '{}' is reserved", email)));
                }
                user.email = email.to_string();
            }
            if let Some(first_name) = update.first_name {
                user.first_name = first_name.trim().to_string();
            }
            if let Some(last_name) = update.last_name {
                user.last_name = last_name.trim().to_string();
            }
            if let Some(grade_level) = update.grade_level {
                user.grade_level = Some(grade_level);
            }
            if let Some(height_cm) = update.height_cm {
                user.height_cm = Some(height_cm);
            }
            if let Some(weight_kg) = update.weight_kg {
                user.weight_kg = Some(weight_kg);
            }
            if let Some(fitness_goals) = update.fitness_goals {
                user.fitness_goals = fitness_goals;
            }
            if let Some(preferred_activities) = update.preferred_activities {
                user.preferred_activities = preferred_activities;
            }
            user.updated_at = format_utc_rfc3339(now);
            Ok(())
        })?;

        tracing::info!(user_id, "Profile updated");

        Ok(Profile::new(user, self.db.user_points(user_id)))
    }

    pub fn user_stats(&self, user_id: u64) -> Result<UserStats> {
        let user = self.user(user_id)?;
        let goals = self.db.goals_for_user(user_id);

        Ok(UserStats {
            user_id,
            total_points: self.db.user_points(user_id),
            total_activities: self.db.activities_for_user(user_id).len() as u32,
            bmi: user.bmi(),
            active_goals: goals.iter().filter(|g| g.is_active).count() as u32,
            achieved_goals: goals.iter().filter(|g| g.is_achieved).count() as u32,
            username: user.username,
        })
    }

    // ─── Goals ───────────────────────────────────────────────

    pub fn list_goals(&self, user_id: u64) -> Vec<FitnessGoal> {
        self.db.goals_for_user(user_id)
    }

    pub fn create_goal(
        &self,
        user_id: u64,
        new_goal: NewGoal,
        now: DateTime<Utc>,
    ) -> Result<FitnessGoal> {
        new_goal.validate()?;
        self.user(user_id)?;

        let goal = FitnessGoal {
            id: self.db.next_id(),
            user_id,
            goal_type: new_goal.goal_type,
            description: new_goal.description.trim().to_string(),
            target_value: new_goal.target_value,
            current_value: new_goal.current_value,
            target_date: new_goal.target_date,
            is_active: true,
            is_achieved: false,
            created_at: format_utc_rfc3339(now),
        };
        self.db.insert_goal(goal.clone());

        tracing::info!(user_id, goal_id = goal.id, "Goal created");
        Ok(goal)
    }

    pub fn mark_goal_achieved(&self, user_id: u64, goal_id: u64) -> Result<FitnessGoal> {
        let goal = self
            .db
            .update_goal(user_id, goal_id, FitnessGoal::mark_achieved)?;
        tracing::info!(user_id, goal_id, "Goal achieved");
        Ok(goal)
    }
}
