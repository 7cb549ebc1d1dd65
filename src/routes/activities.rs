// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity log routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityResponse, ActivitySummary, ActivityTotals, ActivityType};
use crate::services::activity::{ActivityCursor, ActivityFilter, NewActivity};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(log_activity))
        .route("/api/activities/totals", get(get_totals))
        .route("/api/activities/summary", get(get_summary))
        .route(
            "/api/activities/{id}",
            put(update_activity).delete(delete_activity),
        )
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Filter by activity type
    activity_type: Option<ActivityType>,
    /// Only activities on or after this date (YYYY-MM-DD)
    after: Option<String>,
    /// Only activities on or before this date (YYYY-MM-DD)
    before: Option<String>,
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;
const CURSOR_PARTS: usize = 2;

fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|raw| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest(format!("Invalid '{}' parameter: must be YYYY-MM-DD", name))
        })
    })
    .transpose()
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<ActivityCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor = || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            let parts: Vec<&str> = decoded_str.split(':').collect();
            if parts.len() != CURSOR_PARTS {
                return Err(invalid_cursor());
            }

            let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d").map_err(|_| invalid_cursor())?;
            let activity_id = parts[1].parse::<u64>().map_err(|_| invalid_cursor())?;

            Ok(ActivityCursor { date, activity_id })
        })
        .transpose()
}

fn encode_cursor(cursor: ActivityCursor) -> String {
    let payload = format!("{}:{}", cursor.date.format("%Y-%m-%d"), cursor.activity_id);
    URL_SAFE_NO_PAD.encode(payload)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityResponse>,
    pub per_page: u32,
    pub next_cursor: Option<String>,
}

/// List the user's activities, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    tracing::debug!(
        user_id = user.user_id,
        activity_type = ?params.activity_type,
        after = ?params.after,
        before = ?params.before,
        cursor = ?params.cursor,
        "Fetching activities"
    );

    if params.per_page == 0 {
        return Err(AppError::BadRequest(
            "per_page must be greater than 0".to_string(),
        ));
    }
    let limit = params.per_page.min(MAX_PER_PAGE);

    let filter = ActivityFilter {
        activity_type: params.activity_type,
        after: parse_date("after", params.after.as_deref())?,
        before: parse_date("before", params.before.as_deref())?,
        cursor: parse_cursor(params.cursor.as_deref())?,
        limit: limit as usize,
    };

    let page = state.activity_service.list_activities(user.user_id, &filter);

    Ok(Json(ActivitiesResponse {
        activities: page.activities.into_iter().map(Into::into).collect(),
        per_page: limit,
        next_cursor: page.next_cursor.map(encode_cursor),
    }))
}

/// Log a new activity. Points are computed server-side.
async fn log_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(new_activity): Json<NewActivity>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    let activity = state
        .activity_service
        .log_activity(user.user_id, new_activity, Utc::now())?;
    Ok((StatusCode::CREATED, Json(activity.into())))
}

/// Edit one of the user's own activities. Points are recomputed.
async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
    Json(changes): Json<NewActivity>,
) -> Result<Json<ActivityResponse>> {
    let activity = state
        .activity_service
        .update_activity(user.user_id, activity_id, changes)?;
    Ok(Json(activity.into()))
}

async fn get_totals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<ActivityTotals> {
    Json(state.activity_service.totals(user.user_id))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<ActivitySummary> {
    Json(
        state
            .activity_service
            .summary(user.user_id, Utc::now().date_naive()),
    )
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(activity_id): Path<u64>,
) -> Result<StatusCode> {
    state
        .activity_service
        .delete_activity(user.user_id, activity_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = ActivityCursor {
            date: NaiveDate::from_ymd_opt(2024, 8, 21).unwrap(),
            activity_id: 42,
        };

        let encoded = encode_cursor(cursor);
        let decoded = parse_cursor(Some(&encoded)).unwrap().unwrap();

        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_rejects_invalid_input() {
        let err = parse_cursor(Some("not-base64")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let wrong_shape = URL_SAFE_NO_PAD.encode("2024-08-21");
        assert!(parse_cursor(Some(&wrong_shape)).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("after", Some("2024-08-21")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 21)
        );
        assert!(parse_date("after", Some("21/08/2024")).is_err());
        assert_eq!(parse_date("after", None).unwrap(), None);
    }
}
