// ABOUTME: Integration tests for scheduling, the calendar feed and attendance marking
// ABOUTME: Covers attendance provisioning on create, full-replace saves and cross-coach isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use common::{add_test_player, create_test_coach, create_test_team, setup_test_app};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use team_mgmt::constants::error_messages;
use team_mgmt::database::EventInput;
use team_mgmt::models::{Coach, Event, EventType, Player, Sport, Team};
use team_mgmt::resources::ServerResources;

// ============================================================================
// Test Helpers
// ============================================================================

fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

async fn schedule(
    resources: &ServerResources,
    coach: &Coach,
    team: &Team,
    title: &str,
    date: NaiveDate,
) -> Event {
    resources
        .database
        .events()
        .create(
            coach.id,
            &EventInput {
                team_id: team.id,
                title: title.to_owned(),
                event_type: EventType::Practice,
                date,
                time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
                location: "Main gym".to_owned(),
                opponent: None,
                notes: None,
            },
        )
        .await
        .unwrap()
}

async fn team_with_three(resources: &Arc<ServerResources>, coach: &Coach) -> (Team, Vec<Player>) {
    let team = create_test_team(resources, coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let mut players = Vec::new();
    for (first, last) in [("Ann", "Avery"), ("Ben", "Brooks"), ("Cy", "Cole")] {
        players.push(add_test_player(resources, coach, &team, first, last).await.unwrap());
    }
    (team, players)
}

fn present_flags(body: &Value) -> Vec<(String, bool)> {
    let mut flags: Vec<(String, bool)> = body["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| {
            (
                p["player_id"].as_str().unwrap().to_owned(),
                p["present"].as_bool().unwrap(),
            )
        })
        .collect();
    flags.sort();
    flags
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test]
async fn test_create_event_provisions_absent_attendance() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let (team, players) = team_with_three(&resources, &coach).await;
    let date = days_from_today(3).to_string();

    let response = AxumTestRequest::post("/events")
        .cookie(&token)
        .form(&[
            ("team_id", team.id.to_string()),
            ("title", "Shootaround".to_owned()),
            ("event_type", "Practice".to_owned()),
            ("date", date),
            ("time", "18:00".to_owned()),
            ("location", "North gym".to_owned()),
        ])
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/schedule"));

    let event = resources
        .database
        .events()
        .list_for_team(coach.id, team.id, None)
        .await
        .unwrap()
        .pop()
        .unwrap();

    let response = AxumTestRequest::get(&format!("/api/events/{}/attendance", event.id))
        .bearer(&token)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["event_id"], event.id.to_string());
    assert_eq!(body["team_id"], team.id.to_string());
    let flags = present_flags(&body);
    assert_eq!(flags.len(), players.len());
    assert!(flags.iter().all(|(_, present)| !present));
}

#[tokio::test]
async fn test_create_event_validation() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();

    let response = AxumTestRequest::post("/events")
        .cookie(&token)
        .form(&[
            ("team_id", team.id.to_string()),
            ("title", "Scrimmage".to_owned()),
            ("event_type", "Scrimmage".to_owned()),
            ("date", "2024-09-01".to_owned()),
            ("time", "18:00".to_owned()),
            ("location", "Gym".to_owned()),
        ])
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json_value();
    assert_eq!(body["page"], "schedule");
    assert_eq!(body["error"]["message"], error_messages::INVALID_EVENT_TYPE);

    let response = AxumTestRequest::post("/events")
        .cookie(&token)
        .form(&[("team_id", team.id.to_string()), ("title", "No date".to_owned())])
        .send(router)
        .await;
    assert_eq!(
        response.json_value()["error"]["message"],
        error_messages::EVENT_FIELDS_REQUIRED
    );
}

#[tokio::test]
async fn test_create_event_for_other_coach_team_is_not_found() {
    let (router, resources, _coach_a, token_a) = setup_test_app().await.unwrap();
    let (coach_b, _token_b) = create_test_coach(&resources, "coach_b").await.unwrap();
    let team_b = create_test_team(&resources, &coach_b, "Ravens", Sport::Soccer, 0)
        .await
        .unwrap();

    let response = AxumTestRequest::post("/events")
        .cookie(&token_a)
        .form(&[
            ("team_id", team_b.id.to_string()),
            ("title", "Sneaky".to_owned()),
            ("event_type", "Game".to_owned()),
            ("date", "2024-09-01".to_owned()),
            ("time", "18:00".to_owned()),
            ("location", "Away".to_owned()),
        ])
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(resources
        .database
        .events()
        .list_for_team(coach_b.id, team_b.id, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_schedule_splits_upcoming_and_past() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    schedule(&resources, &coach, &team, "Later", days_from_today(10)).await;
    schedule(&resources, &coach, &team, "Today", days_from_today(0)).await;
    schedule(&resources, &coach, &team, "Yesterday", days_from_today(-1)).await;
    schedule(&resources, &coach, &team, "Last month", days_from_today(-30)).await;

    let response = AxumTestRequest::get("/schedule").cookie(&token).send(router).await;
    let body = response.json_value();
    let titles = |key: &str| -> Vec<String> {
        body[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_owned())
            .collect()
    };

    assert_eq!(titles("upcoming"), vec!["Today", "Later"]);
    assert_eq!(titles("past"), vec!["Yesterday", "Last month"]);
    assert_eq!(body["upcoming"][0]["team_name"], "Eagles");
}

#[tokio::test]
async fn test_edit_and_delete_event() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let event = schedule(&resources, &coach, &team, "Practice", days_from_today(2)).await;

    let response = AxumTestRequest::post(&format!("/events/{}/edit", event.id))
        .cookie(&token)
        .form(&[
            ("team_id", team.id.to_string()),
            ("title", "Home opener".to_owned()),
            ("event_type", "Game".to_owned()),
            ("date", "2030-01-15".to_owned()),
            ("time", "19:00".to_owned()),
            ("location", "Arena".to_owned()),
            ("opponent", "Hawks".to_owned()),
        ])
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let updated = resources.database.events().require(coach.id, event.id).await.unwrap();
    assert_eq!(updated.title, "Home opener");
    assert_eq!(updated.event_type, EventType::Game);
    assert_eq!(updated.opponent.as_deref(), Some("Hawks"));

    let response = AxumTestRequest::post(&format!("/events/{}/delete", event.id))
        .cookie(&token)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let response = AxumTestRequest::get(&format!("/api/events/{}/attendance", event.id))
        .bearer(&token)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Calendar
// ============================================================================

#[tokio::test]
async fn test_calendar_range() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    schedule(&resources, &coach, &team, "Early", d("2024-08-31")).await;
    schedule(&resources, &coach, &team, "Inside", d("2024-09-10")).await;
    schedule(&resources, &coach, &team, "Boundary", d("2024-09-30")).await;
    schedule(&resources, &coach, &team, "Late", d("2024-10-01")).await;

    let response = AxumTestRequest::get("/api/calendar?start=2024-09-01&end=2024-09-30")
        .bearer(&token)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["title"], "Inside");
    assert_eq!(events[1]["title"], "Boundary");
    assert_eq!(events[0]["team_name"], "Eagles");
    assert_eq!(events[0]["event_type"], "Practice");

    let all = AxumTestRequest::get("/api/calendar").bearer(&token).send(router.clone()).await;
    assert_eq!(all.json_value()["events"].as_array().unwrap().len(), 4);

    let bad = AxumTestRequest::get("/api/calendar?start=September")
        .bearer(&token)
        .send(router)
        .await;
    assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Attendance
// ============================================================================

#[tokio::test]
async fn test_attendance_save_replaces_and_is_idempotent() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let (team, players) = team_with_three(&resources, &coach).await;
    let event = schedule(&resources, &coach, &team, "Practice", days_from_today(1)).await;
    let path = format!("/api/events/{}/attendance", event.id);

    let payload = json!({
        "attendance": {
            players[0].id.to_string(): true,
            players[1].id.to_string(): true,
        }
    });
    for _ in 0..2 {
        let response = AxumTestRequest::post(&path)
            .bearer(&token)
            .json(&payload)
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json_value(), json!({ "success": true, "updated": 3 }));
    }

    let response = AxumTestRequest::post(&path)
        .bearer(&token)
        .json(&json!({ "present_player_ids": [players[2].id.to_string()] }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = AxumTestRequest::get(&path)
        .bearer(&token)
        .send(router)
        .await
        .json_value();
    let flags: std::collections::HashMap<String, bool> = present_flags(&body).into_iter().collect();
    assert!(!flags[&players[0].id.to_string()]);
    assert!(!flags[&players[1].id.to_string()]);
    assert!(flags[&players[2].id.to_string()]);
}

#[tokio::test]
async fn test_attendance_ignores_foreign_ids_and_counts_ratio() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let (team, players) = team_with_three(&resources, &coach).await;
    let first = schedule(&resources, &coach, &team, "One", days_from_today(1)).await;
    schedule(&resources, &coach, &team, "Two", days_from_today(2)).await;

    let response = AxumTestRequest::post(&format!("/api/events/{}/attendance", first.id))
        .bearer(&token)
        .json(&json!({
            "present_player_ids": [
                players[0].id.to_string(),
                uuid::Uuid::new_v4().to_string(),
                "not-a-player",
            ]
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.json_value()["updated"], 3);

    let detail = AxumTestRequest::get(&format!("/teams/{}", team.id))
        .cookie(&token)
        .send(router)
        .await
        .json_value();
    let ratios: Vec<(&str, &str)> = detail["players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["last_name"].as_str().unwrap(), p["attendance"].as_str().unwrap()))
        .collect();
    assert_eq!(ratios, vec![("Avery", "1/2"), ("Brooks", "0/2"), ("Cole", "0/2")]);
}

#[tokio::test]
async fn test_attendance_malformed_json_is_rejected_without_writes() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let (team, players) = team_with_three(&resources, &coach).await;
    let event = schedule(&resources, &coach, &team, "Practice", days_from_today(1)).await;
    let path = format!("/api/events/{}/attendance", event.id);

    AxumTestRequest::post(&path)
        .bearer(&token)
        .json(&json!({ "present_player_ids": [players[0].id.to_string()] }))
        .send(router.clone())
        .await;

    let response = AxumTestRequest::post(&path)
        .bearer(&token)
        .raw_json("{\"attendance\": {")
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json_value()["error"]["code"], "INVALID_FORMAT");

    let body = AxumTestRequest::get(&path).bearer(&token).send(router).await.json_value();
    let present: Vec<bool> = present_flags(&body).into_iter().map(|(_, p)| p).collect();
    assert_eq!(present.iter().filter(|p| **p).count(), 1);
}

#[tokio::test]
async fn test_attendance_of_other_coach_event_is_not_found() {
    let (router, resources, _coach_a, token_a) = setup_test_app().await.unwrap();
    let (coach_b, _token_b) = create_test_coach(&resources, "coach_b").await.unwrap();
    let (team_b, _players) = team_with_three(&resources, &coach_b).await;
    let event_b = schedule(&resources, &coach_b, &team_b, "Private", days_from_today(1)).await;
    let path = format!("/api/events/{}/attendance", event_b.id);

    let get = AxumTestRequest::get(&path).bearer(&token_a).send(router.clone()).await;
    assert_eq!(get.status_code(), StatusCode::NOT_FOUND);

    let post = AxumTestRequest::post(&path)
        .bearer(&token_a)
        .json(&json!({ "attendance": {} }))
        .send(router)
        .await;
    assert_eq!(post.status_code(), StatusCode::NOT_FOUND);
}
