// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users: profile, dashboard and goals.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::FitnessGoal;
use crate::services::dashboard::Dashboard;
use crate::services::profile::{NewGoal, Profile, ProfileUpdate, UserStats};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/users/{id}/stats", get(get_user_stats))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/{id}/achieve", post(achieve_goal))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    Ok(Json(state.profile_service.get_profile(user.user_id)?))
}

/// Update the current user's profile. Absent fields are unchanged.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>> {
    let profile = state
        .profile_service
        .update_profile(user.user_id, update, Utc::now())?;
    Ok(Json(profile))
}

async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<UserStats>> {
    Ok(Json(state.profile_service.user_stats(user_id)?))
}

// ─── Dashboard ───────────────────────────────────────────────

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Dashboard>> {
    let dashboard = state
        .dashboard_service
        .dashboard(user.user_id, Utc::now().date_naive())?;
    Ok(Json(dashboard))
}

// ─── Goals ───────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub goal_type: crate::models::GoalType,
    pub description: String,
    pub target_value: Option<f64>,
    pub current_value: f64,
    pub target_date: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub is_achieved: bool,
    pub progress_percentage: f64,
    pub created_at: String,
}

impl From<FitnessGoal> for GoalResponse {
    fn from(goal: FitnessGoal) -> Self {
        Self {
            progress_percentage: goal.progress_percentage(),
            id: goal.id,
            goal_type: goal.goal_type,
            description: goal.description,
            target_value: goal.target_value,
            current_value: goal.current_value,
            target_date: goal.target_date,
            is_active: goal.is_active,
            is_achieved: goal.is_achieved,
            created_at: goal.created_at,
        }
    }
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<GoalResponse>> {
    Json(
        state
            .profile_service
            .list_goals(user.user_id)
            .into_iter()
            .map(Into::into)
            .collect(),
    )
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(new_goal): Json<NewGoal>,
) -> Result<(StatusCode, Json<GoalResponse>)> {
    let goal = state
        .profile_service
        .create_goal(user.user_id, new_goal, Utc::now())?;
    Ok((StatusCode::CREATED, Json(goal.into())))
}

async fn achieve_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(goal_id): Path<u64>,
) -> Result<Json<GoalResponse>> {
    let goal = state
        .profile_service
        .mark_goal_achieved(user.user_id, goal_id)?;
    Ok(Json(goal.into()))
}
