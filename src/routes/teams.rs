// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::team::{MembershipFilter, NewTeam, TeamStats, TeamUpdate, TeamView};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route(
            "/api/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/api/teams/{id}/join", post(join_team))
        .route("/api/teams/{id}/leave", post(leave_team))
        .route("/api/teams/{id}/stats", get(team_stats))
}

#[derive(Deserialize)]
struct TeamsQuery {
    #[serde(default)]
    filter: MembershipFilter,
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<TeamsQuery>,
) -> Json<Vec<TeamView>> {
    Json(state.team_service.list_teams(user.user_id, params.filter))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<u64>,
) -> Result<Json<TeamView>> {
    Ok(Json(state.team_service.get_team(user.user_id, team_id)?))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(new_team): Json<NewTeam>,
) -> Result<(StatusCode, Json<TeamView>)> {
    let team = state
        .team_service
        .create_team(user.user_id, new_team, Utc::now())?;
    Ok((StatusCode::CREATED, Json(team)))
}

async fn update_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<u64>,
    Json(update): Json<TeamUpdate>,
) -> Result<Json<TeamView>> {
    Ok(Json(
        state
            .team_service
            .update_team(user.user_id, team_id, update)?,
    ))
}

async fn join_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<u64>,
) -> Result<Json<TeamView>> {
    Ok(Json(state.team_service.join_team(user.user_id, team_id)?))
}

async fn leave_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<u64>,
) -> Result<Json<TeamView>> {
    Ok(Json(state.team_service.leave_team(user.user_id, team_id)?))
}

async fn team_stats(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<u64>,
) -> Result<Json<TeamStats>> {
    Ok(Json(state.team_service.team_stats(team_id)?))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(team_id): Path<u64>,
) -> Result<StatusCode> {
    state.team_service.delete_team(user.user_id, team_id)?;
    Ok(StatusCode::NO_CONTENT)
}
