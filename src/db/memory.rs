// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles, login credentials, unique username/email index)
//! - Activities (per-user activity logs)
//! - Teams (records, unique name index, membership)
//! - Goals (per-user fitness goals)
//! - Leaderboard rank snapshot
//!
//! Every map is a `DashMap`, so individual operations are safe to call from
//! concurrent handlers. Operations that must be atomic (name reservation,
//! team membership changes) hold a single entry lock for their duration.

use crate::error::AppError;
use crate::models::{Activity, Credentials, FitnessGoal, Team, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Store {
    next_id: AtomicU64,
    users: DashMap<u64, User>,
    /// Keyed by lowercased username
    credentials: DashMap<String, Credentials>,
    /// Lowercased email -> user ID
    emails: DashMap<String, u64>,
    /// User ID -> that user's activities
    activities: DashMap<u64, Vec<Activity>>,
    teams: DashMap<u64, Team>,
    /// Lowercased team name -> team ID
    team_names: DashMap<String, u64>,
    /// User ID -> that user's goals
    goals: DashMap<u64, Vec<FitnessGoal>>,
    /// User ID -> rank at the last snapshot
    rank_snapshot: DashMap<u64, u32>,
}

/// In-memory database handle. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct MemoryDb {
    store: Arc<Store>,
}

/// Normalize a unique key (username, email, team name).
pub fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next store-wide ID (starts at 1).
    pub fn next_id(&self) -> u64 {
        self.store.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    // ─── Users ───────────────────────────────────────────────

    /// Insert a new user with credentials.
    ///
    /// Fails with `Conflict` if the username or email is already taken.
    /// Nothing is stored on failure.
    pub fn insert_user(&self, user: User, credentials: Credentials) -> Result<(), AppError> {
        let username_key = index_key(&user.username);
        let email_key = index_key(&user.email);

        match self.store.credentials.entry(username_key.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(format!(
                    "Username '{}' is already taken",
                    user.username
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(credentials);
            }
        }

        match self.store.emails.entry(email_key) {
            Entry::Occupied(_) => {
                self.store.credentials.remove(&username_key);
                return Err(AppError::Conflict(format!(
                    "Email '{}' is already registered",
                    user.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        tracing::debug!(user_id = user.id, username = %user.username, "User stored");
        self.store.users.insert(user.id, user);
        Ok(())
    }

    pub fn get_user(&self, user_id: u64) -> Option<User> {
        self.store.users.get(&user_id).map(|u| u.clone())
    }

    pub fn find_credentials(&self, username: &str) -> Option<Credentials> {
        self.store
            .credentials
            .get(&index_key(username))
            .map(|c| c.clone())
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        let user_id = self.find_credentials(username)?.user_id;
        self.get_user(user_id)
    }

    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.store.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Mutate a user under its entry lock.
    ///
    /// The email index follows an email change; a taken email is a
    /// `Conflict` and leaves the record untouched. The closure must not
    /// touch the user map.
    pub fn update_user<F>(&self, user_id: u64, f: F) -> Result<User, AppError>
    where
        F: FnOnce(&mut User) -> Result<(), AppError>,
    {
        let mut entry = self
            .store
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        let mut updated = entry.value().clone();
        f(&mut updated)?;

        let old_key = index_key(&entry.email);
        let new_key = index_key(&updated.email);
        if old_key != new_key {
            match self.store.emails.entry(new_key) {
                Entry::Occupied(_) => {
                    return Err(AppError::Conflict(format!(
                        "Email '{}' is already registered",
                        updated.email
                    )))
                }
                Entry::Vacant(slot) => {
                    slot.insert(user_id);
                }
            }
            self.store.emails.remove(&old_key);
        }

        *entry.value_mut() = updated.clone();
        Ok(updated)
    }

    /// Total points for a user: carried history plus logged activities.
    pub fn user_points(&self, user_id: u64) -> u32 {
        let carried = self
            .store
            .users
            .get(&user_id)
            .map_or(0, |u| u.carried_points);
        carried + self.activity_points(user_id)
    }

    fn activity_points(&self, user_id: u64) -> u32 {
        self.store
            .activities
            .get(&user_id)
            .map_or(0, |list| list.iter().map(|a| a.points).sum())
    }

    // ─── Activities ──────────────────────────────────────────

    pub fn insert_activity(&self, activity: Activity) {
        self.store
            .activities
            .entry(activity.user_id)
            .or_default()
            .push(activity);
    }

    /// A user's activities in insertion order.
    pub fn activities_for_user(&self, user_id: u64) -> Vec<Activity> {
        self.store
            .activities
            .get(&user_id)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Every user's activities, keyed by user ID.
    pub fn activities_by_user(&self) -> HashMap<u64, Vec<Activity>> {
        self.store
            .activities
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Remove an activity owned by `user_id`. Returns the removed record.
    pub fn remove_activity(&self, user_id: u64, activity_id: u64) -> Option<Activity> {
        let mut list = self.store.activities.get_mut(&user_id)?;
        let index = list.iter().position(|a| a.id == activity_id)?;
        Some(list.remove(index))
    }

    /// Mutate an activity owned by `user_id`. Activities of other users
    /// are `NotFound`.
    pub fn update_activity<F>(
        &self,
        user_id: u64,
        activity_id: u64,
        f: F,
    ) -> Result<Activity, AppError>
    where
        F: FnOnce(&mut Activity),
    {
        let not_found = || AppError::NotFound(format!("Activity {} not found", activity_id));
        let mut list = self.store.activities.get_mut(&user_id).ok_or_else(not_found)?;
        let activity = list
            .iter_mut()
            .find(|a| a.id == activity_id)
            .ok_or_else(not_found)?;
        f(activity);
        Ok(activity.clone())
    }

    // ─── Teams ───────────────────────────────────────────────

    /// Insert a new team. Fails with `Conflict` on a duplicate name.
    pub fn insert_team(&self, team: Team) -> Result<(), AppError> {
        match self.store.team_names.entry(index_key(&team.name)) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(format!(
                    "A team named '{}' already exists",
                    team.name
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(team.id);
            }
        }
        self.store.teams.insert(team.id, team);
        Ok(())
    }

    pub fn get_team(&self, team_id: u64) -> Option<Team> {
        self.store.teams.get(&team_id).map(|t| t.clone())
    }

    pub fn list_teams(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = self.store.teams.iter().map(|t| t.clone()).collect();
        teams.sort_by_key(|t| t.id);
        teams
    }

    /// Mutate a team under its entry lock.
    ///
    /// The closure must not touch the team map.
    pub fn update_team<F, R>(&self, team_id: u64, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Team) -> Result<R, AppError>,
    {
        let mut team = self
            .store
            .teams
            .get_mut(&team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;
        f(team.value_mut())
    }

    /// Move a team's unique name from `old_name` to `new_name`.
    ///
    /// Safe to call from inside `update_team`; only the name index is touched.
    pub fn rename_team(&self, team_id: u64, old_name: &str, new_name: &str) -> Result<(), AppError> {
        let old_key = index_key(old_name);
        let new_key = index_key(new_name);
        if old_key == new_key {
            return Ok(());
        }

        match self.store.team_names.entry(new_key) {
            Entry::Occupied(_) => {
                return Err(AppError::Conflict(format!(
                    "A team named '{}' already exists",
                    new_name
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(team_id);
            }
        }
        self.store.team_names.remove(&old_key);
        Ok(())
    }

    pub fn remove_team(&self, team_id: u64) -> Option<Team> {
        let (_, team) = self.store.teams.remove(&team_id)?;
        self.store.team_names.remove(&index_key(&team.name));
        Some(team)
    }

    /// Total points for a team: carried points plus every registered
    /// member's total.
    pub fn team_points(&self, team: &Team) -> u32 {
        team.carried_points
            + team
                .members
                .iter()
                .map(|&user_id| self.user_points(user_id))
                .sum::<u32>()
    }

    /// Teams the user is a registered member of.
    pub fn teams_for_user(&self, user_id: u64) -> Vec<Team> {
        self.list_teams()
            .into_iter()
            .filter(|t| t.is_member(user_id))
            .collect()
    }

    // ─── Goals ───────────────────────────────────────────────

    pub fn insert_goal(&self, goal: FitnessGoal) {
        self.store.goals.entry(goal.user_id).or_default().push(goal);
    }

    pub fn goals_for_user(&self, user_id: u64) -> Vec<FitnessGoal> {
        self.store
            .goals
            .get(&user_id)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Mutate one of a user's goals. `NotFound` if the user has no such goal.
    pub fn update_goal<F>(&self, user_id: u64, goal_id: u64, f: F) -> Result<FitnessGoal, AppError>
    where
        F: FnOnce(&mut FitnessGoal),
    {
        let not_found = || AppError::NotFound(format!("Goal {} not found", goal_id));
        let mut list = self.store.goals.get_mut(&user_id).ok_or_else(not_found)?;
        let goal = list
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(not_found)?;
        f(goal);
        Ok(goal.clone())
    }

    // ─── Leaderboard Snapshot ────────────────────────────────

    pub fn previous_rank(&self, user_id: u64) -> Option<u32> {
        self.store.rank_snapshot.get(&user_id).map(|r| *r)
    }

    /// Replace the rank snapshot wholesale.
    pub fn replace_rank_snapshot<I>(&self, ranks: I)
    where
        I: IntoIterator<Item = (u64, u32)>,
    {
        self.store.rank_snapshot.clear();
        for (user_id, rank) in ranks {
            self.store.rank_snapshot.insert(user_id, rank);
        }
    }
}
