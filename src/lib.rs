// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OctoFit Tracker: a student fitness tracker
//!
//! This crate provides the backend API for logging activities, joining
//! teams and competing on the school leaderboards.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod time_utils;

use config::Config;
use db::MemoryDb;
use services::{
    ActivityService, AuthService, DashboardService, LeaderboardService, ProfileService,
    TeamService,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: MemoryDb,
    pub auth_service: AuthService,
    pub activity_service: ActivityService,
    pub team_service: TeamService,
    pub leaderboard_service: LeaderboardService,
    pub dashboard_service: DashboardService,
    pub profile_service: ProfileService,
}

impl AppState {
    /// Wire every service to one shared store.
    pub fn new(config: Config, db: MemoryDb) -> Self {
        let leaderboard_service = LeaderboardService::new(db.clone());
        let dashboard_service = DashboardService::new(
            db.clone(),
            leaderboard_service.clone(),
            config.weekly_activity_goal,
            config.weekly_points_goal,
        );

        Self {
            auth_service: AuthService::new(db.clone(), config.demo_login_enabled),
            activity_service: ActivityService::new(db.clone()),
            team_service: TeamService::new(db.clone()),
            profile_service: ProfileService::new(db.clone(), config.demo_login_enabled),
            leaderboard_service,
            dashboard_service,
            config,
            db,
        }
    }
}
