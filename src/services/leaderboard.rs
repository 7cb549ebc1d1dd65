// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboards, the weekly challenge and achievements.
//!
//! Everything here is derived from the store on each call. The only
//! leaderboard state kept between calls is the rank snapshot that rank
//! changes are measured against.

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::leaderboard::{
    rank_badge, rank_change, AchievementContext, AchievementStatus, IndividualEntry, RankTrend,
    TeamEntry, WeeklyChallengeStatus, WeeklyEntry, ACHIEVEMENTS, CURRENT_CHALLENGE,
};
use crate::models::stats::this_week;
use crate::models::team::average_points;
use crate::models::ActivityTotals;
use crate::time_utils::{week_end, week_start};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Length of the weekly board.
pub const WEEKLY_LEADERBOARD_SIZE: usize = 50;

/// A user's standing before ranks are assigned.
#[derive(Debug, Clone)]
pub struct Standing {
    pub user_id: u64,
    pub username: String,
    pub name: String,
    pub points: u32,
    pub weekly_points: u32,
}

/// Highest points first; ties break by name, then ID.
fn by_points(a: (u32, &str, u64), b: (u32, &str, u64)) -> Ordering {
    b.0.cmp(&a.0)
        .then_with(|| a.1.cmp(b.1))
        .then_with(|| a.2.cmp(&b.2))
}

/// Rank standings, attaching the change against each user's previous rank.
pub fn rank_standings<F>(mut standings: Vec<Standing>, previous_rank: F) -> Vec<IndividualEntry>
where
    F: Fn(u64) -> Option<u32>,
{
    standings.sort_by(|a, b| {
        by_points(
            (a.points, a.name.as_str(), a.user_id),
            (b.points, b.name.as_str(), b.user_id),
        )
    });

    standings
        .into_iter()
        .zip(1u32..)
        .map(|(standing, rank)| {
            let change = rank_change(previous_rank(standing.user_id), rank);
            IndividualEntry {
                rank,
                user_id: standing.user_id,
                username: standing.username,
                name: standing.name,
                points: standing.points,
                weekly_points: standing.weekly_points,
                change,
                trend: RankTrend::from_change(change),
                badge: rank_badge(rank),
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct LeaderboardService {
    db: MemoryDb,
}

impl LeaderboardService {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    fn standings(&self, today: NaiveDate) -> Vec<Standing> {
        let activities = self.db.activities_by_user();
        self.db
            .list_users()
            .into_iter()
            .map(|user| {
                let own = activities.get(&user.id).map(Vec::as_slice).unwrap_or(&[]);
                let weekly = ActivityTotals::from_activities(this_week(own, today));
                Standing {
                    user_id: user.id,
                    name: user.display_name(),
                    points: user.carried_points + own.iter().map(|a| a.points).sum::<u32>(),
                    weekly_points: weekly.total_points,
                    username: user.username,
                }
            })
            .collect()
    }

    /// All users ranked by total points.
    pub fn individual(&self, today: NaiveDate) -> Vec<IndividualEntry> {
        rank_standings(self.standings(today), |id| self.db.previous_rank(id))
    }

    /// Users with points in the last seven days, ranked by those points.
    pub fn weekly(&self, today: NaiveDate) -> Vec<WeeklyEntry> {
        let mut standings: Vec<Standing> = self
            .standings(today)
            .into_iter()
            .filter(|s| s.weekly_points > 0)
            .collect();
        standings.sort_by(|a, b| {
            by_points(
                (a.weekly_points, a.name.as_str(), a.user_id),
                (b.weekly_points, b.name.as_str(), b.user_id),
            )
        });
        standings.truncate(WEEKLY_LEADERBOARD_SIZE);

        standings
            .into_iter()
            .zip(1u32..)
            .map(|(standing, rank)| WeeklyEntry {
                rank,
                user_id: standing.user_id,
                username: standing.username,
                name: standing.name,
                weekly_points: standing.weekly_points,
                badge: rank_badge(rank),
            })
            .collect()
    }

    /// The user's current individual rank.
    pub fn rank_of(&self, user_id: u64, today: NaiveDate) -> Option<u32> {
        self.individual(today)
            .into_iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.rank)
    }

    /// All teams ranked by total points.
    pub fn teams(&self) -> Vec<TeamEntry> {
        let mut scored: Vec<_> = self
            .db
            .list_teams()
            .into_iter()
            .map(|team| (self.db.team_points(&team), team))
            .collect();
        scored.sort_by(|(a_points, a), (b_points, b)| {
            by_points((*a_points, a.name.as_str(), a.id), (*b_points, b.name.as_str(), b.id))
        });

        scored
            .into_iter()
            .zip(1u32..)
            .map(|((total_points, team), rank)| {
                let members = team.member_count();
                TeamEntry {
                    rank,
                    team_id: team.id,
                    captain: self
                        .db
                        .get_user(team.captain_id)
                        .map(|u| u.display_name())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    team_name: team.name,
                    members,
                    total_points,
                    avg_points: average_points(total_points, members),
                    badge: rank_badge(rank),
                }
            })
            .collect()
    }

    /// Best rank among the teams the user belongs to.
    pub fn best_team_rank(&self, user_id: u64) -> Option<u32> {
        let mine: Vec<u64> = self
            .db
            .teams_for_user(user_id)
            .iter()
            .map(|t| t.id)
            .collect();
        self.teams()
            .into_iter()
            .filter(|entry| mine.contains(&entry.team_id))
            .map(|entry| entry.rank)
            .min()
    }

    /// Status of the current calendar-week challenge.
    pub fn weekly_challenge(&self, user_id: u64, today: NaiveDate) -> WeeklyChallengeStatus {
        let challenge = &CURRENT_CHALLENGE;
        let start = week_start(today);
        let end = week_end(today);

        let mut participants = 0;
        let mut completions = 0;
        let mut user_progress = 0;
        for (id, activities) in self.db.activities_by_user() {
            let in_week: Vec<_> = activities
                .iter()
                .filter(|a| a.date >= start && a.date <= end)
                .collect();
            if in_week.is_empty() {
                continue;
            }

            let progress = challenge.kind.progress(in_week);
            participants += 1;
            if progress >= challenge.target {
                completions += 1;
            }
            if id == user_id {
                user_progress = progress;
            }
        }

        let user_progress_percentage = if challenge.target == 0 {
            100.0
        } else {
            let pct = f64::from(user_progress) / f64::from(challenge.target) * 100.0;
            (pct.min(100.0) * 10.0).round() / 10.0
        };

        WeeklyChallengeStatus {
            name: challenge.name.to_string(),
            description: challenge.description.to_string(),
            kind: challenge.kind,
            target: challenge.target,
            week_start: start,
            week_end: end,
            participants,
            completions,
            user_progress,
            user_progress_percentage,
            days_left: (end - today).num_days().max(0) as u32,
        }
    }

    /// The achievement catalog with the user's earned flags.
    pub fn achievements(&self, user_id: u64) -> Result<Vec<AchievementStatus>> {
        if self.db.get_user(user_id).is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let ctx = AchievementContext::new(
            &self.db.activities_for_user(user_id),
            self.db.user_points(user_id),
            self.db.teams_for_user(user_id).len() as u32,
        );

        Ok(ACHIEVEMENTS
            .iter()
            .map(|a| AchievementStatus {
                name: a.name.to_string(),
                description: a.description.to_string(),
                icon: a.icon.to_string(),
                earned: a.rule.is_met(&ctx),
            })
            .collect())
    }

    /// Record current ranks as the baseline for future rank changes.
    pub fn roll_snapshot(&self, today: NaiveDate) -> usize {
        let ranks: Vec<(u64, u32)> = self
            .individual(today)
            .into_iter()
            .map(|e| (e.user_id, e.rank))
            .collect();
        let count = ranks.len();
        self.db.replace_rank_snapshot(ranks);

        tracing::info!(users = count, "Leaderboard snapshot rolled");
        count
    }
}
