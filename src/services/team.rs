// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team management: creation, membership and per-team statistics.

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::team::{average_points, is_hex_color, DEFAULT_COLOR, DEFAULT_MAX_MEMBERS};
use crate::models::Team;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Team creation form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTeam {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[serde(default = "default_max_members", alias = "maxMembers")]
    #[validate(range(min = 5, max = 100))]
    pub max_members: u32,
    #[serde(default)]
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

/// Partial team edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TeamUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default, alias = "maxMembers")]
    #[validate(range(min = 5, max = 100))]
    pub max_members: Option<u32>,
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
}

fn default_max_members() -> u32 {
    DEFAULT_MAX_MEMBERS
}

fn validate_color(color: &str) -> std::result::Result<(), ValidationError> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

/// Which teams a listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipFilter {
    #[default]
    All,
    /// Teams the caller belongs to
    Mine,
    /// Teams the caller could join
    Available,
}

/// A team as seen by one user.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamView {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub members: u32,
    pub max_members: u32,
    pub total_points: u32,
    pub captain: String,
    pub color: String,
    pub is_member: bool,
    pub is_full: bool,
    pub is_captain: bool,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MostActiveMember {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub team_id: u64,
    pub total_points: u32,
    pub member_count: u32,
    pub avg_points: u32,
    pub fill_percentage: f64,
    pub most_active_member: Option<MostActiveMember>,
}

#[derive(Clone)]
pub struct TeamService {
    db: MemoryDb,
}

impl TeamService {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    fn captain_name(&self, team: &Team) -> String {
        self.db
            .get_user(team.captain_id)
            .map(|u| u.display_name())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn view(&self, team: &Team, user_id: u64) -> TeamView {
        TeamView {
            id: team.id,
            name: team.name.clone(),
            description: team.description.clone(),
            members: team.member_count(),
            max_members: team.max_members,
            total_points: self.db.team_points(team),
            captain: self.captain_name(team),
            color: team.color.clone(),
            is_member: team.is_member(user_id),
            is_full: team.is_full(),
            is_captain: team.captain_id == user_id,
        }
    }

    /// Teams ordered by total points (highest first), then name.
    pub fn list_teams(&self, user_id: u64, filter: MembershipFilter) -> Vec<TeamView> {
        let mut views: Vec<TeamView> = self
            .db
            .list_teams()
            .iter()
            .map(|team| self.view(team, user_id))
            .filter(|view| match filter {
                MembershipFilter::All => true,
                MembershipFilter::Mine => view.is_member,
                MembershipFilter::Available => !view.is_member && !view.is_full,
            })
            .collect();

        views.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.name.cmp(&b.name))
        });
        views
    }

    pub fn get_team(&self, user_id: u64, team_id: u64) -> Result<TeamView> {
        let team = self
            .db
            .get_team(team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;
        Ok(self.view(&team, user_id))
    }

    /// Create a team captained by its creator.
    pub fn create_team(
        &self,
        user_id: u64,
        new_team: NewTeam,
        now: DateTime<Utc>,
    ) -> Result<TeamView> {
        new_team.validate()?;

        let name = new_team.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Team name must not be blank".to_string()));
        }
        if self.db.get_user(user_id).is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let team = Team {
            id: self.db.next_id(),
            name: name.to_string(),
            description: new_team.description.trim().to_string(),
            max_members: new_team.max_members,
            captain_id: user_id,
            color: new_team
                .color
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            carried_members: 0,
            carried_points: 0,
            members: BTreeSet::from([user_id]),
            created_at: format_utc_rfc3339(now),
        };

        self.db.insert_team(team.clone())?;
        tracing::info!(team_id = team.id, user_id, name = %team.name, "Team created");

        Ok(self.view(&team, user_id))
    }

    /// Edit a team's details. Only its captain may do so.
    pub fn update_team(&self, user_id: u64, team_id: u64, update: TeamUpdate) -> Result<TeamView> {
        update.validate()?;

        let name = update.name.as_deref().map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(AppError::BadRequest("Team name must not be blank".to_string()));
        }

        let team = self.db.update_team(team_id, |team| {
            if team.captain_id != user_id {
                return Err(AppError::Forbidden(
                    "Only the team captain can edit the team".to_string(),
                ));
            }
            if let Some(max_members) = update.max_members {
                if max_members < team.member_count() {
                    return Err(AppError::BadRequest(format!(
                        "Team already has {} members",
                        team.member_count()
                    )));
                }
            }

            // Renaming is the last step that can fail
            if let Some(name) = name {
                self.db.rename_team(team.id, &team.name, name)?;
                team.name = name.to_string();
            }
            if let Some(description) = update.description.as_deref() {
                team.description = description.trim().to_string();
            }
            if let Some(max_members) = update.max_members {
                team.max_members = max_members;
            }
            if let Some(color) = update.color {
                team.color = color;
            }
            Ok(team.clone())
        })?;

        tracing::info!(team_id, user_id, name = %team.name, "Team updated");
        Ok(self.view(&team, user_id))
    }

    /// Add the user to a team.
    pub fn join_team(&self, user_id: u64, team_id: u64) -> Result<TeamView> {
        if self.db.get_user(user_id).is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let team = self.db.update_team(team_id, |team| {
            if team.is_member(user_id) {
                return Err(AppError::BadRequest(
                    "Already a member of this team".to_string(),
                ));
            }
            if team.is_full() {
                return Err(AppError::Conflict(format!("Team '{}' is full", team.name)));
            }
            team.members.insert(user_id);
            Ok(team.clone())
        })?;

        tracing::info!(team_id, user_id, members = team.member_count(), "Joined team");
        Ok(self.view(&team, user_id))
    }

    /// Remove the user from a team.
    ///
    /// A captain may only leave once no other member remains.
    pub fn leave_team(&self, user_id: u64, team_id: u64) -> Result<TeamView> {
        let team = self.db.update_team(team_id, |team| {
            if !team.is_member(user_id) {
                return Err(AppError::BadRequest(
                    "Not a member of this team".to_string(),
                ));
            }
            if team.captain_id == user_id && team.member_count() > 1 {
                return Err(AppError::BadRequest(
                    "The captain cannot leave while other members remain".to_string(),
                ));
            }
            team.members.remove(&user_id);
            Ok(team.clone())
        })?;

        tracing::info!(team_id, user_id, members = team.member_count(), "Left team");
        Ok(self.view(&team, user_id))
    }

    pub fn team_stats(&self, team_id: u64) -> Result<TeamStats> {
        let team = self
            .db
            .get_team(team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;

        let total_points = self.db.team_points(&team);
        let member_count = team.member_count();

        // Highest points wins; equal points go to the lower user ID
        let most_active_member = team
            .members
            .iter()
            .filter_map(|&id| self.db.get_user(id))
            .map(|user| MostActiveMember {
                user_id: user.id,
                name: user.display_name(),
                points: self.db.user_points(user.id),
            })
            .max_by(|a, b| a.points.cmp(&b.points).then_with(|| b.user_id.cmp(&a.user_id)));

        Ok(TeamStats {
            team_id,
            total_points,
            member_count,
            avg_points: average_points(total_points, member_count),
            fill_percentage: (team.fill_percentage() * 10.0).round() / 10.0,
            most_active_member,
        })
    }

    /// Delete a team. Only its captain may do so.
    pub fn delete_team(&self, user_id: u64, team_id: u64) -> Result<()> {
        let team = self
            .db
            .get_team(team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;

        if team.captain_id != user_id {
            return Err(AppError::Forbidden(
                "Only the team captain can delete the team".to_string(),
            ));
        }

        self.db.remove_team(team_id);
        tracing::info!(team_id, user_id, name = %team.name, "Team deleted");
        Ok(())
    }
}
