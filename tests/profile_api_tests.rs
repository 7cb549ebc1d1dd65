// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile, stats and goal API tests.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_partial_profile_update() {
    let (app, state) = common::create_test_app();
    let (_, token) = common::create_test_user(&state, "alice");

    let (status, _, profile) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/api/me",
            Some(&token),
            Some(json!({ "height_cm": 180, "weight_kg": 81, "grade_level": "11" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["height_cm"], 180);
    assert_eq!(profile["grade_level"], "11");
    assert_eq!(profile["bmi"], 25.0);
    // Untouched fields keep their values
    assert_eq!(profile["email"], "alice@mergington.edu");
    assert_eq!(profile["first_name"], "alice");

    let (_, _, profile) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/api/me",
            Some(&token),
            Some(json!({ "fitness_goals": "Run a 10k" })),
        ),
    )
    .await;
    assert_eq!(profile["fitness_goals"], "Run a 10k");
    assert_eq!(profile["height_cm"], 180);
}

#[tokio::test]
async fn test_profile_update_validation() {
    let (app, state) = common::create_test_app();
    let (_, token) = common::create_test_user(&state, "alice");

    for body in [
        json!({ "height_cm": 99 }),
        json!({ "weight_kg": 201 }),
        json!({ "email": "not-an-email" }),
    ] {
        let (status, _, error) = common::send(
            &app,
            common::request(Method::PUT, "/api/me", Some(&token), Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(error["error"], "bad_request");
    }

    // Nothing was applied
    let (_, _, profile) =
        common::send(&app, common::request(Method::GET, "/api/me", Some(&token), None)).await;
    assert!(profile["height_cm"].is_null());
}

#[tokio::test]
async fn test_user_stats() {
    let (app, state) = common::create_test_app();
    let (alice_id, alice) = common::create_test_user(&state, "alice");
    let (_, bob) = common::create_test_user(&state, "bob");

    common::send(
        &app,
        common::request(
            Method::POST,
            "/api/activities",
            Some(&alice),
            Some(json!({
                "name": "Yoga",
                "type": "Yoga",
                "duration": 30,
                "intensity": "Light"
            })),
        ),
    )
    .await;

    // Any signed-in user can view stats
    let (status, _, stats) = common::send(
        &app,
        common::request(
            Method::GET,
            &format!("/api/users/{}/stats", alice_id),
            Some(&bob),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["username"], "alice");
    assert_eq!(stats["total_points"], 30);
    assert_eq!(stats["total_activities"], 1);
    assert!(stats["bmi"].is_null());

    let (status, _, _) = common::send(
        &app,
        common::request(Method::GET, "/api/users/999999/stats", Some(&bob), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_goal_lifecycle() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    let (_, bob) = common::create_test_user(&state, "bob");

    let (status, _, goal) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/goals",
            Some(&alice),
            Some(json!({
                "goal_type": "endurance",
                "description": "Run 50km this month",
                "target_value": 50.0,
                "current_value": 20.0
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["progress_percentage"], 40.0);
    assert_eq!(goal["is_active"], true);
    let achieve = format!("/api/goals/{}/achieve", goal["id"]);

    // Goals belong to their owner
    let (status, _, _) =
        common::send(&app, common::request(Method::POST, &achieve, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, goal) =
        common::send(&app, common::request(Method::POST, &achieve, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["is_achieved"], true);
    assert_eq!(goal["is_active"], false);

    let (_, _, goals) =
        common::send(&app, common::request(Method::GET, "/api/goals", Some(&bob), None)).await;
    assert!(goals.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_goal_requires_description() {
    let (app, state) = common::create_test_app();
    let (_, token) = common::create_test_user(&state, "alice");

    let (status, _, _) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/goals",
            Some(&token),
            Some(json!({ "goal_type": "strength", "description": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_email_change_respects_uniqueness() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    common::create_test_user(&state, "bob");

    let (status, _, _) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/api/me",
            Some(&alice),
            Some(json!({ "email": "BOB@mergington.edu" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, profile) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/api/me",
            Some(&alice),
            Some(json!({ "email": "alice.new@mergington.edu" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "alice.new@mergington.edu");
}

#[tokio::test]
async fn test_demo_email_cannot_be_claimed() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");

    let (status, _, body) = common::send(
        &app,
        common::request(
            Method::PUT,
            "/api/me",
            Some(&alice),
            Some(json!({ "email": "demo@mergington.edu", "first_name": "Alicia" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (_, _, profile) =
        common::send(&app, common::request(Method::GET, "/api/me", Some(&alice), None)).await;
    assert_eq!(profile["email"], "alice@mergington.edu");
    assert_eq!(profile["first_name"], "alice");

    let (status, _, _) = common::send(
        &app,
        common::request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "demo", "password": "demo" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
