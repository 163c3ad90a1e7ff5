// ABOUTME: Integration tests for stat entry, per-event and per-player reports and the stats page
// ABOUTME: Saving twice for one event updates the same game instead of adding a second one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use axum::Router;
use chrono::{NaiveDate, NaiveTime};
use common::{add_test_player, create_test_coach, create_test_team, setup_test_app};
use helpers::axum_test::{AxumTestRequest, AxumTestResponse};
use serde_json::{json, Value};
use team_mgmt::database::EventInput;
use team_mgmt::models::{Coach, Event, EventType, Sport, Team};
use team_mgmt::resources::ServerResources;

// ============================================================================
// Test Helpers
// ============================================================================

async fn game_event(resources: &ServerResources, coach: &Coach, team: &Team, opponent: &str) -> Event {
    resources
        .database
        .events()
        .create(
            coach.id,
            &EventInput {
                team_id: team.id,
                title: format!("Home vs {opponent}"),
                event_type: EventType::Game,
                date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
                time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                location: "Arena".to_owned(),
                opponent: Some(opponent.to_owned()),
                notes: None,
            },
        )
        .await
        .unwrap()
}

async fn save(router: &Router, token: &str, body: &Value) -> AxumTestResponse {
    AxumTestRequest::post("/api/stats/save")
        .bearer(token)
        .json(body)
        .send(router.clone())
        .await
}

// ============================================================================
// Saving
// ============================================================================

#[tokio::test]
async fn test_save_basketball_line_derives_points() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = game_event(&resources, &coach, &team, "Hawks").await;

    let response = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "event_id": event.id, "is_win": true },
            "stats": {
                player.id.to_string(): { "two_pt_made": 3, "three_pt_made": 2, "ft_made": 4 }
            }
        }),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["success"], true);
    assert_eq!(body["saved"], 1);

    let report = AxumTestRequest::get(&format!("/api/events/{}/stats", event.id))
        .bearer(&token)
        .send(router)
        .await
        .json_value();
    assert_eq!(report["game"]["id"], body["game_id"]);
    assert_eq!(report["game"]["title"], "Home vs Hawks");
    assert_eq!(report["game"]["opponent"], "Hawks");
    assert_eq!(report["game"]["date"], "2024-11-02");
    let line = &report["stats"][player.id.to_string()];
    assert_eq!(line["sport"], "Basketball");
    assert_eq!(line["two_pt_made"], 3);
    assert_eq!(line["derived_points"], 16);
    assert!(line["total_points"].is_null());
}

#[tokio::test]
async fn test_supplied_total_points_kept_alongside_derived() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = game_event(&resources, &coach, &team, "Hawks").await;

    save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "event_id": event.id },
            "stats": { player.id.to_string(): { "two_pt_made": 1, "total_points": 30 } }
        }),
    )
    .await;

    let report = AxumTestRequest::get(&format!("/api/events/{}/stats", event.id))
        .bearer(&token)
        .send(router)
        .await
        .json_value();
    let line = &report["stats"][player.id.to_string()];
    assert_eq!(line["total_points"], 30);
    assert_eq!(line["derived_points"], 2);
}

#[tokio::test]
async fn test_resave_for_event_updates_same_game() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = game_event(&resources, &coach, &team, "Hawks").await;

    let first = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "event_id": event.id, "is_win": false },
            "stats": { player.id.to_string(): { "ft_made": 1 } }
        }),
    )
    .await
    .json_value();
    let second = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "event_id": event.id, "is_win": true },
            "stats": { player.id.to_string(): { "ft_made": 5 } }
        }),
    )
    .await
    .json_value();

    assert_eq!(first["game_id"], second["game_id"]);
    let games = resources.database.games().list_for_team(coach.id, team.id).await.unwrap();
    assert_eq!(games.len(), 1);
    assert!(games[0].is_win);

    let lines = resources.database.stats().for_game(games[0].id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].derived_points(), Some(5));
}

#[tokio::test]
async fn test_save_skips_players_not_on_team() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Soccer, 0)
        .await
        .unwrap();
    let other_team = create_test_team(&resources, &coach, "Reserves", Sport::Soccer, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let outsider = add_test_player(&resources, &coach, &other_team, "Bo", "Brooks")
        .await
        .unwrap();

    let response = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "date": "2024-10-05", "opponent": "Rovers" },
            "stats": {
                player.id.to_string(): { "goals": 2 },
                outsider.id.to_string(): { "goals": 9 },
                "not-a-uuid": { "goals": 1 },
            }
        }),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json_value()["saved"], 1);

    let games = resources.database.games().list_for_team(coach.id, team.id).await.unwrap();
    assert_eq!(games[0].title, "Game vs Rovers");
    assert!(games[0].event_id.is_none());
}

#[tokio::test]
async fn test_save_rejects_bad_payloads_without_writes() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();

    let negative = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "date": "2024-10-05" },
            "stats": { player.id.to_string(): { "assists": -2 } }
        }),
    )
    .await;
    assert_eq!(negative.status_code(), StatusCode::BAD_REQUEST);

    let not_object = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "date": "2024-10-05" },
            "stats": { player.id.to_string(): 12 }
        }),
    )
    .await;
    assert_eq!(not_object.status_code(), StatusCode::BAD_REQUEST);

    let no_date = save(
        &router,
        &token,
        &json!({ "game": { "team_id": team.id }, "stats": {} }),
    )
    .await;
    assert_eq!(no_date.status_code(), StatusCode::BAD_REQUEST);

    let malformed = AxumTestRequest::post("/api/stats/save")
        .bearer(&token)
        .raw_json("{\"game\":")
        .send(router)
        .await;
    assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);

    assert!(resources
        .database
        .games()
        .list_for_team(coach.id, team.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_save_rejects_out_of_range_counters() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let cases = [
        (Sport::Basketball, json!({ "two_pt_made": 3_000_000_000_u64 })),
        (Sport::Basketball, json!({ "total_points": 5_000_000 })),
        (Sport::TrackAndField, json!({ "race_time_seconds": -5 })),
        (Sport::Swimming, json!({ "distance_meters": "-100" })),
        (Sport::Other, json!({ "throws": -2 })),
    ];

    for (index, (sport, counters)) in cases.into_iter().enumerate() {
        let team = create_test_team(&resources, &coach, &format!("Team {index}"), sport, 0)
            .await
            .unwrap();
        let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();

        let response = save(
            &router,
            &token,
            &json!({
                "game": { "team_id": team.id, "date": "2024-10-05" },
                "stats": { player.id.to_string(): counters }
            }),
        )
        .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{sport:?}");
        assert!(resources
            .database
            .games()
            .list_for_team(coach.id, team.id)
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn test_other_sport_counter_named_sport_reads_back() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Throwers", Sport::Other, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = game_event(&resources, &coach, &team, "Rovers").await;

    let response = save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "event_id": event.id },
            "stats": { player.id.to_string(): { "sport": 3, "throws": 2 } }
        }),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let history = AxumTestRequest::get(&format!("/api/players/{}/stats", player.id))
        .bearer(&token)
        .send(router.clone())
        .await;
    assert_eq!(history.status_code(), StatusCode::OK);
    let stats = &history.json_value()["history"][0]["stats"];
    assert_eq!(stats["sport"], "Other");
    assert_eq!(stats["counters"]["sport"].as_f64(), Some(3.0));
    assert_eq!(stats["counters"]["throws"].as_f64(), Some(2.0));

    let by_event = AxumTestRequest::get(&format!("/api/events/{}/stats", event.id))
        .bearer(&token)
        .send(router)
        .await;
    assert_eq!(by_event.status_code(), StatusCode::OK);
    let line = &by_event.json_value()["stats"][player.id.to_string()];
    assert_eq!(line["counters"]["sport"].as_f64(), Some(3.0));
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
async fn test_save_checks_team_and_event_ownership() {
    let (router, resources, coach_a, token_a) = setup_test_app().await.unwrap();
    let (coach_b, _token_b) = create_test_coach(&resources, "coach_b").await.unwrap();
    let team_a = create_test_team(&resources, &coach_a, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let second_a = create_test_team(&resources, &coach_a, "Juniors", Sport::Basketball, 0)
        .await
        .unwrap();
    let team_b = create_test_team(&resources, &coach_b, "Ravens", Sport::Basketball, 0)
        .await
        .unwrap();
    let juniors_game = game_event(&resources, &coach_a, &second_a, "Hawks").await;
    let ravens_game = game_event(&resources, &coach_b, &team_b, "Owls").await;

    let foreign_team = save(
        &router,
        &token_a,
        &json!({ "game": { "team_id": team_b.id, "date": "2024-10-05" }, "stats": {} }),
    )
    .await;
    assert_eq!(foreign_team.status_code(), StatusCode::NOT_FOUND);

    let mismatched_event = save(
        &router,
        &token_a,
        &json!({ "game": { "team_id": team_a.id, "event_id": juniors_game.id }, "stats": {} }),
    )
    .await;
    assert_eq!(mismatched_event.status_code(), StatusCode::NOT_FOUND);

    let foreign_report = AxumTestRequest::get(&format!("/api/events/{}/stats", ravens_game.id))
        .bearer(&token_a)
        .send(router)
        .await;
    assert_eq!(foreign_report.status_code(), StatusCode::NOT_FOUND);

    assert!(resources
        .database
        .games()
        .list_for_team(coach_a.id, team_a.id)
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Reports
// ============================================================================

#[tokio::test]
async fn test_event_stats_before_any_save() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let event = game_event(&resources, &coach, &team, "Hawks").await;

    let response = AxumTestRequest::get(&format!("/api/events/{}/stats", event.id))
        .bearer(&token)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json_value(), json!({ "game": null, "stats": {} }));
}

#[tokio::test]
async fn test_player_history_lists_games() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = game_event(&resources, &coach, &team, "Hawks").await;

    save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "event_id": event.id, "is_win": true },
            "stats": { player.id.to_string(): { "three_pt_made": 4 } }
        }),
    )
    .await;
    save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "date": "2024-12-01", "opponent": "Owls" },
            "stats": { player.id.to_string(): { "ft_made": 2 } }
        }),
    )
    .await;

    let response = AxumTestRequest::get(&format!("/api/players/{}/stats", player.id))
        .bearer(&token)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["player"]["name"], "Ada Avery");
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    for entry in history {
        assert_eq!(entry["team_name"], "Eagles");
    }
    let points: Vec<i64> = history
        .iter()
        .map(|e| e["stats"]["derived_points"].as_i64().unwrap())
        .collect();
    assert!(points.contains(&12));
    assert!(points.contains(&2));
    assert!(history.iter().all(|e| e["stats"]["total_rebounds"] == 0));

    let (_coach_b, token_b) = create_test_coach(&resources, "coach_b").await.unwrap();
    let foreign = AxumTestRequest::get(&format!("/api/players/{}/stats", player.id))
        .bearer(&token_b)
        .send(router)
        .await;
    assert_eq!(foreign.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_page_season_summary() {
    let (router, resources, coach, token) = setup_test_app().await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let ada = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let bo = add_test_player(&resources, &coach, &team, "Bo", "Brooks").await.unwrap();
    create_test_team(&resources, &coach, "Strikers", Sport::Soccer, 0)
        .await
        .unwrap();

    save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "date": "2024-10-01", "is_win": true },
            "stats": {
                ada.id.to_string(): { "two_pt_made": 2 },
                bo.id.to_string(): { "two_pt_made": 5, "total_points": 9 },
            }
        }),
    )
    .await;
    save(
        &router,
        &token,
        &json!({
            "game": { "team_id": team.id, "date": "2024-10-08", "is_win": false },
            "stats": { ada.id.to_string(): { "three_pt_made": 1 } }
        }),
    )
    .await;

    let response = AxumTestRequest::get("/stats").cookie(&token).send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json_value();
    assert_eq!(body["page"], "stats");

    let teams = body["teams"].as_array().unwrap();
    let eagles = teams.iter().find(|t| t["team"]["name"] == "Eagles").unwrap();
    assert_eq!(eagles["games_played"], 2);
    assert_eq!(eagles["wins"], 1);
    assert_eq!(eagles["losses"], 1);
    assert_eq!(eagles["player_points"][0]["name"], "Bo Brooks");
    assert_eq!(eagles["player_points"][0]["points"], 9);
    assert_eq!(eagles["player_points"][1]["points"], 7);

    let strikers = teams.iter().find(|t| t["team"]["name"] == "Strikers").unwrap();
    assert_eq!(strikers["games_played"], 0);
    assert!(strikers["player_points"].as_array().unwrap().is_empty());
}
