// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Team model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default team capacity when none is given.
pub const DEFAULT_MAX_MEMBERS: u32 = 25;
/// Default team color.
pub const DEFAULT_COLOR: &str = "#007bff";

/// Stored team record.
///
/// Headcount and points are split between registered members (tracked by ID)
/// and carried values brought in with seed data for students who never
/// registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Capacity
    pub max_members: u32,
    /// User ID of the captain
    pub captain_id: u64,
    /// Hex color (`#rrggbb`)
    pub color: String,
    /// Members that are not registered users
    pub carried_members: u32,
    /// Points earned by carried members
    pub carried_points: u32,
    /// Registered members
    pub members: BTreeSet<u64>,
    pub created_at: String,
}

impl Team {
    pub fn member_count(&self) -> u32 {
        self.carried_members + self.members.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.member_count() >= self.max_members
    }

    pub fn is_member(&self, user_id: u64) -> bool {
        self.members.contains(&user_id)
    }

    /// Capacity usage in percent (0..=100).
    pub fn fill_percentage(&self) -> f64 {
        if self.max_members == 0 {
            return 100.0;
        }
        (f64::from(self.member_count()) / f64::from(self.max_members) * 100.0).min(100.0)
    }
}

/// Average points per member, 0 for an empty team.
pub fn average_points(total_points: u32, member_count: u32) -> u32 {
    if member_count == 0 {
        0
    } else {
        (f64::from(total_points) / f64::from(member_count)).round() as u32
    }
}

/// Check a `#rrggbb` color string.
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
