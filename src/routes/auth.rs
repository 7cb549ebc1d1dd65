// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and logout routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::User;
use crate::services::auth::NewUser;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionUser {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub username: String,
    pub name: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub user: SessionUser,
    /// Same token as the session cookie, for clients that send a Bearer header
    pub token: String,
}

/// Cookies are marked `Secure` whenever the frontend itself is served over HTTPS.
fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"))
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

fn start_session(state: &AppState, jar: CookieJar, user: User) -> Result<(CookieJar, AuthResponse)> {
    let token = create_jwt(user.id, &state.config.jwt_signing_key).map_err(AppError::Internal)?;
    let jar = jar.add(session_cookie(state, token.clone()));

    Ok((
        jar,
        AuthResponse {
            user: SessionUser {
                id: user.id,
                name: user.display_name(),
                username: user.username,
            },
            token,
        },
    ))
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let user = state.auth_service.register(new_user, Utc::now())?;
    let (jar, body) = start_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// Verify credentials and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let user = state
        .auth_service
        .login(req.username.trim(), &req.password, Utc::now())?;
    let (jar, body) = start_session(&state, jar, user)?;
    Ok((jar, Json(body)))
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    // Removal must repeat the attributes the cookie was set with
    let removal = Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"));

    (StatusCode::NO_CONTENT, jar.remove(removal))
}
