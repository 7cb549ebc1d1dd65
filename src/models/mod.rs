// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod goal;
pub mod leaderboard;
pub mod stats;
pub mod team;
pub mod user;

pub use activity::{
    calculate_points, Activity, ActivityResponse, ActivityTotals, ActivityType, Intensity,
};
pub use goal::{FitnessGoal, GoalType};
pub use stats::ActivitySummary;
pub use team::Team;
pub use user::{Credentials, GradeLevel, User};
