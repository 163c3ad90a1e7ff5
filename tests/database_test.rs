// ABOUTME: Database tests against a file-backed SQLite store: cascades, upserts and scoping
// ABOUTME: Exercises the managers directly without going through the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use common::{add_test_player, create_test_coach, create_test_team, test_config};
use serde_json::json;
use tempfile::TempDir;
use team_mgmt::database::{Database, EventInput, GameInput, PlayerStatEntry};
use team_mgmt::models::{Coach, Event, EventType, Sport, StatLine, Team};
use team_mgmt::resources::ServerResources;

async fn file_backed_resources() -> (TempDir, Arc<ServerResources>) {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("team_mgmt.db");
    let database = Database::new(&format!("sqlite:{}", path.display()))
        .await
        .unwrap();
    (dir, Arc::new(ServerResources::new(database, test_config())))
}

async fn practice(resources: &ServerResources, coach: &Coach, team: &Team) -> Event {
    resources
        .database
        .events()
        .create(
            coach.id,
            &EventInput {
                team_id: team.id,
                title: "Practice".to_owned(),
                event_type: EventType::Practice,
                date: NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
                time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
                location: "Main gym".to_owned(),
                opponent: None,
                notes: None,
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (_dir, resources) = file_backed_resources().await;
    resources.database.migrate().await.unwrap();
    resources.database.ping().await.unwrap();
}

#[tokio::test]
async fn test_team_delete_cascades_to_roster_and_schedule() {
    let (_dir, resources) = file_backed_resources().await;
    let (coach, _token) = create_test_coach(&resources, "coach_a").await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = practice(&resources, &coach, &team).await;

    resources.database.teams().delete(coach.id, team.id).await.unwrap();

    let db = &resources.database;
    assert!(db.players().get(coach.id, player.id).await.unwrap().is_none());
    assert!(db.events().get(coach.id, event.id).await.unwrap().is_none());
    let (attendance_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendance")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(attendance_rows, 0);
}

#[tokio::test]
async fn test_event_delete_keeps_game_without_link() {
    let (_dir, resources) = file_backed_resources().await;
    let (coach, _token) = create_test_coach(&resources, "coach_a").await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let event = practice(&resources, &coach, &team).await;

    let db = &resources.database;
    let game = GameInput {
        team_id: team.id,
        event_id: Some(event.id),
        title: "Scrimmage".to_owned(),
        opponent: String::new(),
        date: event.date,
        is_win: true,
    };
    let (game_id, saved) = db.stats().save_game(coach.id, &game, &[]).await.unwrap();
    assert_eq!(saved, 0);

    db.events().delete(coach.id, event.id).await.unwrap();

    let games = db.games().list_for_team(coach.id, team.id).await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, game_id);
    assert!(games[0].event_id.is_none());
    assert_eq!(db.games().record_for_team(coach.id, team.id).await.unwrap().wins, 1);
}

#[tokio::test]
async fn test_attendance_and_stat_lines_update_in_place() {
    let (_dir, resources) = file_backed_resources().await;
    let (coach, _token) = create_test_coach(&resources, "coach_a").await.unwrap();
    let team = create_test_team(&resources, &coach, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach, &team, "Ada", "Avery").await.unwrap();
    let event = practice(&resources, &coach, &team).await;
    let db = &resources.database;

    let present: HashSet<_> = [player.id].into_iter().collect();
    db.attendance().save(coach.id, &event, &present).await.unwrap();
    db.attendance().save(coach.id, &event, &present).await.unwrap();
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendance WHERE event_id = $1")
        .bind(event.id.to_string())
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    let ratios = db.attendance().ratios_for_team(team.id).await.unwrap();
    assert_eq!(ratios[&player.id].to_string(), "1/1");

    let counters = |made: u32| {
        let value = json!({ "ft_made": made });
        StatLine::from_counters(Sport::Basketball, value.as_object().unwrap()).unwrap()
    };
    let game = GameInput {
        team_id: team.id,
        event_id: Some(event.id),
        title: "Practice".to_owned(),
        opponent: String::new(),
        date: event.date,
        is_win: false,
    };
    for made in [2, 7] {
        let entry = PlayerStatEntry {
            player_id: player.id,
            line: counters(made),
            total_points: None,
        };
        db.stats().save_game(coach.id, &game, &[entry]).await.unwrap();
    }

    let lines = db.stats().for_team(coach.id, team.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].derived_points(), Some(7));
}

#[tokio::test]
async fn test_reads_are_scoped_to_owner() {
    let (_dir, resources) = file_backed_resources().await;
    let (coach_a, _) = create_test_coach(&resources, "coach_a").await.unwrap();
    let (coach_b, _) = create_test_coach(&resources, "coach_b").await.unwrap();
    let team = create_test_team(&resources, &coach_a, "Eagles", Sport::Basketball, 0)
        .await
        .unwrap();
    let player = add_test_player(&resources, &coach_a, &team, "Ada", "Avery").await.unwrap();
    let event = practice(&resources, &coach_a, &team).await;
    let db = &resources.database;

    assert!(db.teams().get(coach_b.id, team.id).await.unwrap().is_none());
    assert!(db.players().get(coach_b.id, player.id).await.unwrap().is_none());
    assert!(db.events().get(coach_b.id, event.id).await.unwrap().is_none());
    assert!(db.players().list_for_coach(coach_b.id).await.unwrap().is_empty());
    assert!(db.teams().delete(coach_b.id, team.id).await.is_err());
    assert!(db.teams().get(coach_a.id, team.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_profile_is_created_on_first_read() {
    let (_dir, resources) = file_backed_resources().await;
    let (coach, _) = create_test_coach(&resources, "coach_a").await.unwrap();
    let db = &resources.database;

    let first = db.coaches().profile(coach.id).await.unwrap();
    assert_eq!(first.sport, Sport::Other);
    assert!(first.gender.is_none());

    let again = db.coaches().profile(coach.id).await.unwrap();
    assert_eq!(again.coach_id, coach.id);
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coach_profiles")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
