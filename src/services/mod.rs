// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod auth;
pub mod dashboard;
pub mod leaderboard;
pub mod profile;
pub mod team;

pub use activity::ActivityService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use leaderboard::LeaderboardService;
pub use profile::ProfileService;
pub use team::TeamService;
