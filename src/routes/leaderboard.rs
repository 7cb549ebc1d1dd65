// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard routes. Each leaderboard tab is its own route.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::leaderboard::{
    AchievementStatus, IndividualEntry, TeamEntry, WeeklyChallengeStatus, WeeklyEntry,
};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leaderboard", get(individual))
        .route("/api/leaderboard/individual", get(individual))
        .route("/api/leaderboard/weekly", get(weekly))
        .route("/api/leaderboard/teams", get(teams))
        .route("/api/leaderboard/challenge", get(weekly_challenge))
        .route("/api/leaderboard/achievements", get(achievements))
}

async fn individual(State(state): State<Arc<AppState>>) -> Json<Vec<IndividualEntry>> {
    Json(
        state
            .leaderboard_service
            .individual(Utc::now().date_naive()),
    )
}

async fn weekly(State(state): State<Arc<AppState>>) -> Json<Vec<WeeklyEntry>> {
    Json(state.leaderboard_service.weekly(Utc::now().date_naive()))
}

async fn teams(State(state): State<Arc<AppState>>) -> Json<Vec<TeamEntry>> {
    Json(state.leaderboard_service.teams())
}

async fn weekly_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<WeeklyChallengeStatus> {
    Json(
        state
            .leaderboard_service
            .weekly_challenge(user.user_id, Utc::now().date_naive()),
    )
}

async fn achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<AchievementStatus>>> {
    Ok(Json(state.leaderboard_service.achievements(user.user_id)?))
}
