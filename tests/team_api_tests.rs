// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team API tests: creation, membership rules and captain permissions.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

async fn create_team(app: &axum::Router, token: &str, max_members: u32) -> u64 {
    let (status, _, team) = common::send(
        app,
        common::request(
            Method::POST,
            "/api/teams",
            Some(token),
            Some(json!({
                "name": "Lunchtime Lappers",
                "description": "Laps around the track at lunch",
                "max_members": max_members,
                "color": "#17a2b8"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(team["is_captain"], true);
    assert_eq!(team["members"], 1);
    team["id"].as_u64().unwrap()
}

#[tokio::test]
async fn test_create_team_validation() {
    let (app, state) = common::create_test_app();
    let (_, token) = common::create_test_user(&state, "alice");

    for body in [
        json!({ "name": "", "max_members": 10 }),
        json!({ "name": "Tiny", "max_members": 2 }),
        json!({ "name": "Colorful", "color": "blue" }),
    ] {
        let (status, _, error) = common::send(
            &app,
            common::request(Method::POST, "/api/teams", Some(&token), Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(error["error"], "bad_request");
    }
}

#[tokio::test]
async fn test_join_and_leave_team() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    let (_, bob) = common::create_test_user(&state, "bob");
    let team_id = create_team(&app, &alice, 10).await;

    let join = format!("/api/teams/{}/join", team_id);
    let (status, _, team) =
        common::send(&app, common::request(Method::POST, &join, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["members"], 2);
    assert_eq!(team["is_member"], true);

    // Joining twice is rejected
    let (status, _, _) =
        common::send(&app, common::request(Method::POST, &join, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, mine) = common::send(
        &app,
        common::request(Method::GET, "/api/teams?filter=mine", Some(&bob), None),
    )
    .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    // The captain stays while others remain
    let leave = format!("/api/teams/{}/leave", team_id);
    let (status, _, _) =
        common::send(&app, common::request(Method::POST, &leave, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, team) =
        common::send(&app, common::request(Method::POST, &leave, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["members"], 1);
    assert_eq!(team["is_member"], false);
}

#[tokio::test]
async fn test_full_team_rejects_join() {
    let (app, state) = common::create_test_app();
    let (_, captain) = common::create_test_user(&state, "captain");
    let team_id = create_team(&app, &captain, 5).await;
    let join = format!("/api/teams/{}/join", team_id);

    for name in ["member1", "member2", "member3", "member4"] {
        let (_, token) = common::create_test_user(&state, name);
        let (status, _, _) =
            common::send(&app, common::request(Method::POST, &join, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, late) = common::create_test_user(&state, "latecomer");
    let (status, _, body) =
        common::send(&app, common::request(Method::POST, &join, Some(&late), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (_, _, available) = common::send(
        &app,
        common::request(Method::GET, "/api/teams?filter=available", Some(&late), None),
    )
    .await;
    assert!(available.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_captain_deletes_team() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    let (_, bob) = common::create_test_user(&state, "bob");
    let team_id = create_team(&app, &alice, 10).await;
    let uri = format!("/api/teams/{}", team_id);

    let (status, _, body) =
        common::send(&app, common::request(Method::DELETE, &uri, Some(&bob), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _, _) =
        common::send(&app, common::request(Method::DELETE, &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) =
        common::send(&app, common::request(Method::GET, &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_stats_most_active_member() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    let (bob_id, bob) = common::create_test_user(&state, "bob");
    let team_id = create_team(&app, &alice, 10).await;

    common::send(
        &app,
        common::request(Method::POST, &format!("/api/teams/{}/join", team_id), Some(&bob), None),
    )
    .await;
    common::send(
        &app,
        common::request(
            Method::POST,
            "/api/activities",
            Some(&bob),
            Some(json!({
                "name": "Swim",
                "type": "Swimming",
                "duration": 40,
                "intensity": "Vigorous"
            })),
        ),
    )
    .await;

    let (status, _, stats) = common::send(
        &app,
        common::request(
            Method::GET,
            &format!("/api/teams/{}/stats", team_id),
            Some(&alice),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_points"], 80);
    assert_eq!(stats["member_count"], 2);
    assert_eq!(stats["avg_points"], 40);
    assert_eq!(stats["fill_percentage"], 20.0);
    assert_eq!(stats["most_active_member"]["user_id"], bob_id);
}

#[tokio::test]
async fn test_concurrent_joins_respect_capacity() {
    let (app, state) = common::create_test_app();
    let (_, captain) = common::create_test_user(&state, "captain");
    let team_id = create_team(&app, &captain, 5).await;

    let tokens: Vec<String> = (0..12)
        .map(|i| common::create_test_user(&state, &format!("racer{}", i)).1)
        .collect();

    let handles: Vec<_> = tokens
        .into_iter()
        .map(|token| {
            let app = app.clone();
            let uri = format!("/api/teams/{}/join", team_id);
            tokio::spawn(async move {
                common::send(&app, common::request(Method::POST, &uri, Some(&token), None))
                    .await
                    .0
            })
        })
        .collect();

    let mut joined = 0;
    for handle in handles {
        if handle.await.unwrap() == StatusCode::OK {
            joined += 1;
        }
    }

    assert_eq!(joined, 4);
    let team = state.db.get_team(team_id).unwrap();
    assert_eq!(team.member_count(), 5);
}

#[tokio::test]
async fn test_duplicate_team_name_conflicts() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    let (_, bob) = common::create_test_user(&state, "bob");
    create_team(&app, &alice, 10).await;

    let (status, _, body) = common::send(
        &app,
        common::request(
            Method::POST,
            "/api/teams",
            Some(&bob),
            Some(json!({ "name": "lunchtime lappers" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_only_captain_edits_team() {
    let (app, state) = common::create_test_app();
    let (_, alice) = common::create_test_user(&state, "alice");
    let (_, bob) = common::create_test_user(&state, "bob");
    let team_id = create_team(&app, &alice, 10).await;
    let uri = format!("/api/teams/{}", team_id);
    let edit = json!({ "name": "Lunchtime Legends", "maxMembers": 12 });

    let (status, _, body) = common::send(
        &app,
        common::request(Method::PUT, &uri, Some(&bob), Some(edit.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _, team) =
        common::send(&app, common::request(Method::PUT, &uri, Some(&alice), Some(edit))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["name"], "Lunchtime Legends");
    assert_eq!(team["max_members"], 12);
    assert_eq!(team["color"], "#17a2b8");

    let (status, _, _) = common::send(
        &app,
        common::request(
            Method::PUT,
            &uri,
            Some(&alice),
            Some(json!({ "color": "teal" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
