// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Leaderboard entries, weekly challenges and achievements.
//!
//! Nothing here is stored: entries are derived from users, teams and
//! activities whenever a leaderboard is requested.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::activity::{Activity, ActivityType};

// ─── Ranking ─────────────────────────────────────────────────

/// Display badge for a rank: medals for the podium, `#n` otherwise.
pub fn rank_badge(rank: u32) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{}", n),
    }
}

/// Direction of a rank change since the last snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum RankTrend {
    Up,
    Down,
    Same,
}

impl RankTrend {
    pub fn from_change(change: i64) -> Self {
        match change {
            c if c > 0 => RankTrend::Up,
            c if c < 0 => RankTrend::Down,
            _ => RankTrend::Same,
        }
    }
}

/// Places gained since the previous snapshot (positive means moved up).
pub fn rank_change(previous: Option<u32>, current: u32) -> i64 {
    previous.map_or(0, |p| i64::from(p) - i64::from(current))
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IndividualEntry {
    pub rank: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    pub name: String,
    pub points: u32,
    pub weekly_points: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub change: i64,
    pub trend: RankTrend,
    pub badge: String,
}

/// Row of the weekly board, ranked by points from the last seven days.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyEntry {
    pub rank: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    pub name: String,
    pub weekly_points: u32,
    pub badge: String,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamEntry {
    pub rank: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub team_id: u64,
    pub team_name: String,
    pub members: u32,
    pub total_points: u32,
    pub avg_points: u32,
    pub captain: String,
    pub badge: String,
}

// ─── Weekly Challenge ────────────────────────────────────────

/// What a weekly challenge measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Distinct activity types
    ActivityVariety,
    /// Total minutes
    ActivityMinutes,
    /// Total points
    Points,
    /// Distinct days with at least one activity
    Consistency,
}

impl ChallengeKind {
    /// Progress value over the activities that fall inside the challenge week.
    pub fn progress<'a, I>(&self, activities: I) -> u32
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let activities = activities.into_iter();
        match self {
            ChallengeKind::ActivityVariety => activities
                .map(|a| a.activity_type)
                .collect::<BTreeSet<ActivityType>>()
                .len() as u32,
            ChallengeKind::ActivityMinutes => activities.map(|a| a.duration_minutes).sum(),
            ChallengeKind::Points => activities.map(|a| a.points).sum(),
            ChallengeKind::Consistency => {
                activities.map(|a| a.date).collect::<BTreeSet<_>>().len() as u32
            }
        }
    }
}

/// Challenge definition that repeats every calendar week.
#[derive(Debug, Clone)]
pub struct ChallengeDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ChallengeKind,
    pub target: u32,
}

/// The challenge that runs each week.
pub const CURRENT_CHALLENGE: ChallengeDefinition = ChallengeDefinition {
    name: "Step Up Challenge",
    description: "Complete 10 different types of activities this week",
    kind: ChallengeKind::ActivityVariety,
    target: 10,
};

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyChallengeStatus {
    pub name: String,
    pub description: String,
    pub kind: ChallengeKind,
    pub target: u32,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub participants: u32,
    pub completions: u32,
    pub user_progress: u32,
    pub user_progress_percentage: f64,
    pub days_left: u32,
}

// ─── Achievements ────────────────────────────────────────────

/// Inputs an achievement can be judged on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementContext {
    pub activity_count: u32,
    pub total_points: u32,
    pub team_count: u32,
    pub running_km: f64,
    pub strength_activities: u32,
    /// Longest run of consecutive days with an activity
    pub longest_streak_days: u32,
}

impl AchievementContext {
    pub fn new(activities: &[Activity], total_points: u32, team_count: u32) -> Self {
        let running_km = activities
            .iter()
            .filter(|a| a.activity_type == ActivityType::Running)
            .filter_map(|a| a.distance_km)
            .sum();
        let strength_activities = activities
            .iter()
            .filter(|a| a.activity_type == ActivityType::Strength)
            .count() as u32;

        Self {
            activity_count: activities.len() as u32,
            total_points,
            team_count,
            running_km,
            strength_activities,
            longest_streak_days: longest_streak(activities.iter().map(|a| a.date)),
        }
    }
}

/// Length of the longest run of consecutive calendar days.
pub fn longest_streak<I>(dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in days {
        current = match previous {
            Some(p) if p.succ_opt() == Some(day) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }

    longest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementRule {
    MinActivities(u32),
    MinPoints(u32),
    MinTeams(u32),
    MinRunningKm(u32),
    MinStrengthActivities(u32),
    MinStreakDays(u32),
}

impl AchievementRule {
    pub fn is_met(&self, ctx: &AchievementContext) -> bool {
        match *self {
            AchievementRule::MinActivities(n) => ctx.activity_count >= n,
            AchievementRule::MinPoints(n) => ctx.total_points >= n,
            AchievementRule::MinTeams(n) => ctx.team_count >= n,
            AchievementRule::MinRunningKm(n) => ctx.running_km >= f64::from(n),
            AchievementRule::MinStrengthActivities(n) => ctx.strength_activities >= n,
            AchievementRule::MinStreakDays(n) => ctx.longest_streak_days >= n,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AchievementDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: AchievementRule,
}

pub const ACHIEVEMENTS: [AchievementDefinition; 6] = [
    AchievementDefinition {
        name: "First Steps",
        description: "Log your first activity",
        icon: "🏃",
        rule: AchievementRule::MinActivities(1),
    },
    AchievementDefinition {
        name: "Consistency King",
        description: "Log activities 7 days in a row",
        icon: "👑",
        rule: AchievementRule::MinStreakDays(7),
    },
    AchievementDefinition {
        name: "Point Master",
        description: "Earn 1000 total points",
        icon: "🏆",
        rule: AchievementRule::MinPoints(1000),
    },
    AchievementDefinition {
        name: "Team Player",
        description: "Join a team",
        icon: "👥",
        rule: AchievementRule::MinTeams(1),
    },
    AchievementDefinition {
        name: "Distance Demon",
        description: "Run 100km total",
        icon: "🏃",
        rule: AchievementRule::MinRunningKm(100),
    },
    AchievementDefinition {
        name: "Strength Superstar",
        description: "Complete 50 strength activities",
        icon: "💪",
        rule: AchievementRule::MinStrengthActivities(50),
    },
];

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AchievementStatus {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned: bool,
}
