// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user dashboard summary.

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::stats::{this_week, GoalProgress};
use crate::models::{ActivityResponse, ActivityTotals};
use crate::services::activity::ActivityService;
use crate::services::leaderboard::LeaderboardService;
use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const RECENT_ACTIVITY_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyGoals {
    pub activities: GoalProgress,
    pub points: GoalProgress,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Dashboard {
    pub total_points: u32,
    pub weekly_points: u32,
    pub total_activities: u32,
    pub weekly_activities: u32,
    /// Individual leaderboard rank
    pub rank: Option<u32>,
    /// Best rank among the user's teams
    pub team_rank: Option<u32>,
    /// Newest first
    pub recent_activities: Vec<ActivityResponse>,
    pub weekly_goals: WeeklyGoals,
}

#[derive(Clone)]
pub struct DashboardService {
    db: MemoryDb,
    activities: ActivityService,
    leaderboard: LeaderboardService,
    weekly_activity_goal: u32,
    weekly_points_goal: u32,
}

impl DashboardService {
    pub fn new(
        db: MemoryDb,
        leaderboard: LeaderboardService,
        weekly_activity_goal: u32,
        weekly_points_goal: u32,
    ) -> Self {
        Self {
            activities: ActivityService::new(db.clone()),
            db,
            leaderboard,
            weekly_activity_goal,
            weekly_points_goal,
        }
    }

    pub fn dashboard(&self, user_id: u64, today: NaiveDate) -> Result<Dashboard> {
        let user = self
            .db
            .get_user(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let activities = self.db.activities_for_user(user_id);
        let totals = ActivityTotals::from_activities(&activities);
        let week = ActivityTotals::from_activities(this_week(&activities, today));
        let recent = self
            .activities
            .recent_activities(user_id, RECENT_ACTIVITY_COUNT);

        Ok(Dashboard {
            total_points: user.carried_points + totals.total_points,
            weekly_points: week.total_points,
            total_activities: totals.count,
            weekly_activities: week.count,
            rank: self.leaderboard.rank_of(user_id, today),
            team_rank: self.leaderboard.best_team_rank(user_id),
            recent_activities: recent.into_iter().map(Into::into).collect(),
            weekly_goals: WeeklyGoals {
                activities: GoalProgress::new(week.count, self.weekly_activity_goal),
                points: GoalProgress::new(week.total_points, self.weekly_points_goal),
            },
        })
    }
}
