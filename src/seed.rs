// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sample students, teams and activities loaded at startup.
//!
//! Seeded users keep most of their points as carried history, plus one
//! or more activities logged this week. Teams carry the headcount and
//! points of members who are not registered users. Previous leaderboard
//! ranks are seeded so rank changes show up before the first snapshot.

use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::team::DEFAULT_MAX_MEMBERS;
use crate::models::{
    calculate_points, Activity, ActivityType, Credentials, GradeLevel, Intensity, Team, User,
};
use crate::services::auth::{hash_password, DEMO_PASSWORD, DEMO_USERNAME};
use crate::services::leaderboard::LeaderboardService;
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};

struct SeedActivity {
    name: &'static str,
    activity_type: ActivityType,
    duration_minutes: u32,
    intensity: Intensity,
    days_ago: i64,
    distance_km: Option<f64>,
}

struct SeedStudent {
    username: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    grade_level: Option<GradeLevel>,
    /// Total points shown on the leaderboard
    points: u32,
    /// Rank change shown before the first snapshot
    rank_change: i64,
    activities: &'static [SeedActivity],
}

const fn weekly(
    name: &'static str,
    activity_type: ActivityType,
    duration_minutes: u32,
    intensity: Intensity,
) -> SeedActivity {
    SeedActivity {
        name,
        activity_type,
        duration_minutes,
        intensity,
        days_ago: 1,
        distance_km: None,
    }
}

static STUDENTS: [SeedStudent; 10] = [
    SeedStudent {
        username: "FitnessAlex",
        first_name: "Alex",
        last_name: "Johnson",
        grade_level: Some(GradeLevel::Twelfth),
        points: 2450,
        rank_change: 2,
        activities: &[weekly("Track Intervals", ActivityType::Running, 210, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "RunnerSarah",
        first_name: "Sarah",
        last_name: "Davis",
        grade_level: Some(GradeLevel::Eleventh),
        points: 2380,
        rank_change: -1,
        activities: &[weekly("Long Run", ActivityType::Running, 190, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "MikeChen",
        first_name: "Mike",
        last_name: "Chen",
        grade_level: Some(GradeLevel::Twelfth),
        points: 2350,
        rank_change: 1,
        activities: &[weekly("Soccer Scrimmage", ActivityType::Sports, 225, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "EmilyR",
        first_name: "Emily",
        last_name: "Rodriguez",
        grade_level: Some(GradeLevel::Tenth),
        points: 2280,
        rank_change: 0,
        activities: &[weekly("Power Yoga", ActivityType::Yoga, 160, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "TomWilson",
        first_name: "Tom",
        last_name: "Wilson",
        grade_level: Some(GradeLevel::Eleventh),
        points: 2150,
        rank_change: -2,
        activities: &[weekly("Basketball Game", ActivityType::Sports, 145, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "JessicaLee",
        first_name: "Jessica",
        last_name: "Lee",
        grade_level: Some(GradeLevel::Ninth),
        points: 2080,
        rank_change: 3,
        activities: &[weekly("Dance Rehearsal", ActivityType::Dance, 170, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "DavidBrown",
        first_name: "David",
        last_name: "Brown",
        grade_level: Some(GradeLevel::Tenth),
        points: 1950,
        rank_change: -1,
        activities: &[weekly("Hill Ride", ActivityType::Cycling, 140, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "LisaGreen",
        first_name: "Lisa",
        last_name: "Green",
        grade_level: Some(GradeLevel::Eleventh),
        points: 1890,
        rank_change: 1,
        activities: &[weekly("Swim Practice", ActivityType::Swimming, 155, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "JamesMiller",
        first_name: "James",
        last_name: "Miller",
        grade_level: Some(GradeLevel::Ninth),
        points: 1820,
        rank_change: 0,
        activities: &[weekly("Trail Hike", ActivityType::Hiking, 130, Intensity::Vigorous)],
    },
    SeedStudent {
        username: "AmyTaylor",
        first_name: "Amy",
        last_name: "Taylor",
        grade_level: Some(GradeLevel::Twelfth),
        points: 1750,
        rank_change: 2,
        activities: &[weekly("Power Walk", ActivityType::Walking, 110, Intensity::VeryVigorous)],
    },
];

static DEMO_STUDENT: SeedStudent = SeedStudent {
    username: DEMO_USERNAME,
    first_name: "Demo",
    last_name: "Student",
    grade_level: Some(GradeLevel::Eleventh),
    points: 1250,
    rank_change: 5,
    activities: &[
        SeedActivity {
            name: "Morning Run",
            activity_type: ActivityType::Running,
            duration_minutes: 30,
            intensity: Intensity::Moderate,
            days_ago: 0,
            distance_km: Some(5.2),
        },
        SeedActivity {
            name: "Weight Training",
            activity_type: ActivityType::Strength,
            duration_minutes: 45,
            intensity: Intensity::Vigorous,
            days_ago: 1,
            distance_km: None,
        },
        SeedActivity {
            name: "Basketball Practice",
            activity_type: ActivityType::Sports,
            duration_minutes: 60,
            intensity: Intensity::Vigorous,
            days_ago: 2,
            distance_km: None,
        },
    ],
};

struct SeedTeam {
    name: &'static str,
    description: &'static str,
    members: u32,
    max_members: u32,
    points: u32,
    color: &'static str,
    captain: &'static str,
    /// Registered members besides the captain
    also: &'static [&'static str],
}

static TEAMS: [SeedTeam; 5] = [
    SeedTeam {
        name: "Mergington Runners",
        description: "For students who love running and cardio activities",
        members: 25,
        max_members: 30,
        points: 15420,
        color: "#007bff",
        captain: "FitnessAlex",
        also: &[DEMO_USERNAME],
    },
    SeedTeam {
        name: "Strength Squad",
        description: "Weight training and strength building enthusiasts",
        members: 18,
        max_members: DEFAULT_MAX_MEMBERS,
        points: 12850,
        color: "#dc3545",
        captain: "RunnerSarah",
        also: &[],
    },
    SeedTeam {
        name: "Sports All-Stars",
        description: "Multi-sport athletes competing in various activities",
        members: 30,
        max_members: 35,
        points: 18750,
        color: "#28a745",
        captain: "MikeChen",
        also: &[],
    },
    SeedTeam {
        name: "Yoga & Wellness",
        description: "Focus on flexibility, mindfulness, and overall wellness",
        members: 15,
        max_members: 20,
        points: 8920,
        color: "#6f42c1",
        captain: "EmilyR",
        also: &[],
    },
    SeedTeam {
        name: "Basketball Stars",
        description: "Pickup games, drills and the occasional tournament",
        members: 20,
        max_members: DEFAULT_MAX_MEMBERS,
        points: 8450,
        color: "#fd7e14",
        captain: "TomWilson",
        also: &[],
    },
];

/// What was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub activities: usize,
    pub teams: usize,
}

/// Load the sample data into an empty store.
///
/// The demo student is only created when demo login is enabled.
pub fn load_sample_data(
    db: &MemoryDb,
    now: DateTime<Utc>,
    include_demo: bool,
) -> Result<SeedSummary> {
    let today = now.date_naive();
    let timestamp = format_utc_rfc3339(now);

    let students = STUDENTS
        .iter()
        .chain(include_demo.then_some(&DEMO_STUDENT));

    let mut user_ids: HashMap<&'static str, u64> = HashMap::new();
    let mut rank_changes: HashMap<u64, i64> = HashMap::new();
    let mut activity_count = 0;

    for student in students {
        let password = if student.username == DEMO_USERNAME {
            DEMO_PASSWORD.to_string()
        } else {
            student.username.to_lowercase()
        };
        let user_id = seed_student(db, student, &password, today, &timestamp)?;

        user_ids.insert(student.username, user_id);
        rank_changes.insert(user_id, student.rank_change);
        activity_count += student.activities.len();
    }

    for team in &TEAMS {
        seed_team(db, team, &user_ids, &timestamp)?;
    }

    // previous - current = change
    let previous_ranks: Vec<(u64, u32)> = LeaderboardService::new(db.clone())
        .individual(today)
        .into_iter()
        .map(|entry| {
            let change = rank_changes.get(&entry.user_id).copied().unwrap_or(0);
            let previous = (i64::from(entry.rank) + change).max(1) as u32;
            (entry.user_id, previous)
        })
        .collect();
    db.replace_rank_snapshot(previous_ranks);

    let summary = SeedSummary {
        users: user_ids.len(),
        activities: activity_count,
        teams: TEAMS.len(),
    };
    tracing::info!(
        users = summary.users,
        activities = summary.activities,
        teams = summary.teams,
        "Sample data loaded"
    );
    Ok(summary)
}

fn seed_student(
    db: &MemoryDb,
    student: &SeedStudent,
    password: &str,
    today: NaiveDate,
    timestamp: &str,
) -> Result<u64> {
    let user_id = db.next_id();

    let activities: Vec<Activity> = student
        .activities
        .iter()
        .map(|a| Activity {
            id: db.next_id(),
            user_id,
            name: a.name.to_string(),
            activity_type: a.activity_type,
            duration_minutes: a.duration_minutes,
            intensity: a.intensity,
            points: calculate_points(a.duration_minutes, a.intensity),
            date: today - Duration::days(a.days_ago),
            distance_km: a.distance_km,
            notes: None,
            logged_at: timestamp.to_string(),
        })
        .collect();
    let activity_points: u32 = activities.iter().map(|a| a.points).sum();

    let (salt, password_hash) = hash_password(password)?;
    db.insert_user(
        User {
            id: user_id,
            username: student.username.to_string(),
            email: format!("{}@mergington.edu", student.username.to_lowercase()),
            first_name: student.first_name.to_string(),
            last_name: student.last_name.to_string(),
            grade_level: student.grade_level,
            height_cm: None,
            weight_kg: None,
            fitness_goals: String::new(),
            preferred_activities: String::new(),
            carried_points: student.points.saturating_sub(activity_points),
            created_at: timestamp.to_string(),
            updated_at: timestamp.to_string(),
        },
        Credentials {
            user_id,
            salt,
            password_hash,
        },
    )?;

    for activity in activities {
        db.insert_activity(activity);
    }

    Ok(user_id)
}

fn seed_team(
    db: &MemoryDb,
    team: &SeedTeam,
    user_ids: &HashMap<&'static str, u64>,
    timestamp: &str,
) -> Result<()> {
    let captain_id = *user_ids.get(team.captain).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("Seed captain {} missing", team.captain))
    })?;

    let members: BTreeSet<u64> = std::iter::once(captain_id)
        .chain(team.also.iter().filter_map(|name| user_ids.get(name).copied()))
        .collect();
    let member_points: u32 = members.iter().map(|&id| db.user_points(id)).sum();

    db.insert_team(Team {
        id: db.next_id(),
        name: team.name.to_string(),
        description: team.description.to_string(),
        max_members: team.max_members,
        captain_id,
        color: team.color.to_string(),
        carried_members: team.members.saturating_sub(members.len() as u32),
        carried_points: team.points.saturating_sub(member_points),
        members,
        created_at: timestamp.to_string(),
    })
}
