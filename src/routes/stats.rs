// ABOUTME: Game stat entry and reporting: save, per-event and per-player JSON plus the stats page
// ABOUTME: Counter payloads are parsed against the team's sport before anything is written
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Statistics routes
//!
//! Stat lines are keyed by player id. Entries whose key is not a valid id,
//! or names a player outside the team, are skipped rather than rejected.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::pages::{self, PageResult};
use super::{json_rejection, optional_text, parse_form_date, parse_path_id};
use crate::{
    database::{GameInput, PlayerStatEntry, PlayerStatHistory},
    errors::{AppError, AppResult},
    models::{stats::supplied_total_points, Event, Game, PlayerStat, Sport, StatLine, Team},
    resources::ServerResources,
};

/// Game half of a stats submission
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GamePayload {
    /// Owned team
    pub team_id: String,
    /// Owned event on that team
    pub event_id: Option<String>,
    /// Date played; defaults to the event date
    pub date: Option<String>,
    /// Title; defaults from the event or opponent
    pub title: Option<String>,
    /// Opponent; defaults to the event opponent
    pub opponent: Option<String>,
    /// Whether the team won
    pub is_win: bool,
}

/// Stats submission
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveStatsRequest {
    /// Game being recorded
    pub game: GamePayload,
    /// Player id to counter object
    pub stats: Map<String, Value>,
}

/// A stored stat line with stored and derived point totals side by side
#[derive(Debug, Serialize)]
pub struct StatLineView {
    /// Counters, tagged with the sport
    #[serde(flatten)]
    pub line: StatLine,
    /// Total as supplied by the caller
    pub total_points: Option<u32>,
    /// Total computed from the counters
    pub derived_points: Option<u32>,
    /// Offensive plus defensive rebounds (basketball)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rebounds: Option<u32>,
    /// Hits over at bats (baseball with at bats)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batting_average: Option<f64>,
}

impl From<PlayerStat> for StatLineView {
    fn from(stat: PlayerStat) -> Self {
        Self {
            derived_points: stat.derived_points(),
            total_rebounds: stat.line.total_rebounds(),
            batting_average: stat.line.batting_average(),
            total_points: stat.total_points,
            line: stat.line,
        }
    }
}

/// One entry of a player's stat history
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// Game id
    pub game_id: Uuid,
    /// Date played
    pub date: NaiveDate,
    /// Game title
    pub title: String,
    /// Opponent
    pub opponent: String,
    /// Whether the team won
    pub is_win: bool,
    /// Team id
    pub team_id: Uuid,
    /// Team name
    pub team_name: String,
    /// Counters and point totals
    pub stats: StatLineView,
}

impl From<PlayerStatHistory> for HistoryEntry {
    fn from(row: PlayerStatHistory) -> Self {
        let PlayerStatHistory {
            stat,
            game,
            team_name,
        } = row;
        Self {
            game_id: game.id,
            date: game.date,
            title: game.title,
            opponent: game.opponent,
            is_win: game.is_win,
            team_id: game.team_id,
            team_name,
            stats: stat.into(),
        }
    }
}

/// Season points of one player
#[derive(Debug, Serialize)]
pub struct PlayerPoints {
    /// Player id
    pub player_id: Uuid,
    /// Display name
    pub name: String,
    /// Points across the team's games
    pub points: u32,
}

/// Season summary of one team on the stats page
#[derive(Debug, Serialize)]
pub struct TeamSeasonSummary {
    /// Team
    pub team: Team,
    /// Games recorded
    pub games_played: u32,
    /// Games won
    pub wins: u32,
    /// Games lost
    pub losses: u32,
    /// Per-player points, highest first; basketball only
    pub player_points: Vec<PlayerPoints>,
}

/// Title used when a submission has none
fn default_title(event: Option<&Event>, opponent: &str) -> String {
    if let Some(event) = event {
        return event.title.clone();
    }
    if opponent.is_empty() {
        "Game".to_owned()
    } else {
        format!("Game vs {opponent}")
    }
}

/// Parse the player-keyed counters against `sport`, skipping unparseable ids
fn parse_entries(sport: Sport, stats: &Map<String, Value>) -> AppResult<Vec<PlayerStatEntry>> {
    let mut entries = Vec::with_capacity(stats.len());
    for (raw_id, counters) in stats {
        let Ok(player_id) = Uuid::parse_str(raw_id.trim()) else {
            debug!(raw = %raw_id, "Skipping stat line with unparseable player id");
            continue;
        };
        let counters = counters.as_object().ok_or_else(|| {
            AppError::invalid_format(format!("Stats for player {player_id} must be an object"))
        })?;
        entries.push(PlayerStatEntry {
            player_id,
            line: StatLine::from_counters(sport, counters)?,
            total_points: supplied_total_points(counters)?,
        });
    }
    Ok(entries)
}

/// Statistics routes handler
pub struct StatsRoutes;

impl StatsRoutes {
    /// Create stats routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/stats", get(Self::handle_stats_page))
            .route("/api/stats/save", post(Self::handle_save))
            .route("/api/events/:id/stats", get(Self::handle_event_stats))
            .route("/api/players/:id/stats", get(Self::handle_player_history))
            .with_state(resources)
    }

    /// Resolve a submission into a validated game, checking ownership
    async fn resolve_game(
        resources: &ServerResources,
        coach_id: Uuid,
        payload: &GamePayload,
    ) -> AppResult<(Team, GameInput)> {
        let team_id = parse_path_id(&payload.team_id, "Team")?;
        let team = resources.database.teams().require(coach_id, team_id).await?;

        let event = match payload.event_id.as_deref().and_then(optional_text) {
            Some(raw) => {
                let event_id = parse_path_id(&raw, "Event")?;
                let event = resources.database.events().require(coach_id, event_id).await?;
                if event.team_id != team.id {
                    return Err(AppError::not_found("Event"));
                }
                Some(event)
            }
            None => None,
        };

        let date = match (payload.date.as_deref().and_then(optional_text), &event) {
            (Some(raw), _) => parse_form_date(&raw)?,
            (None, Some(event)) => event.date,
            (None, None) => return Err(AppError::missing_field("Game date is required.")),
        };
        let opponent = payload
            .opponent
            .as_deref()
            .and_then(optional_text)
            .or_else(|| event.as_ref().and_then(|e| e.opponent.clone()))
            .unwrap_or_default();
        let title = payload
            .title
            .as_deref()
            .and_then(optional_text)
            .unwrap_or_else(|| default_title(event.as_ref(), &opponent));

        let input = GameInput {
            team_id: team.id,
            event_id: event.map(|e| e.id),
            title,
            opponent,
            date,
            is_win: payload.is_win,
        };
        Ok((team, input))
    }

    /// Handle POST /api/stats/save
    #[tracing::instrument(skip(resources, headers, payload), fields(route = "stats_save"))]
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        payload: Result<Json<SaveStatsRequest>, JsonRejection>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_manager.authenticate_request(&headers)?;
        let Json(request) = payload.map_err(|rejection| json_rejection(&rejection))?;

        let (team, game) = Self::resolve_game(&resources, auth.coach_id, &request.game).await?;
        let entries = parse_entries(team.sport, &request.stats)?;

        let (game_id, saved) = resources
            .database
            .stats()
            .save_game(auth.coach_id, &game, &entries)
            .await?;

        Ok(Json(json!({
            "success": true,
            "game_id": game_id,
            "saved": saved,
        })))
    }

    /// Handle GET /api/events/:id/stats
    async fn handle_event_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_manager.authenticate_request(&headers)?;
        let event_id = parse_path_id(&id, "Event")?;
        resources.database.events().require(auth.coach_id, event_id).await?;

        let game: Option<Game> = resources
            .database
            .games()
            .latest_for_event(auth.coach_id, event_id)
            .await?;

        let mut stats = BTreeMap::new();
        if let Some(game) = &game {
            for stat in resources.database.stats().for_game(game.id).await? {
                stats.insert(stat.player_id.to_string(), StatLineView::from(stat));
            }
        }

        Ok(Json(json!({ "game": game, "stats": stats })))
    }

    /// Handle GET /api/players/:id/stats
    async fn handle_player_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_manager.authenticate_request(&headers)?;
        let player_id = parse_path_id(&id, "Player")?;
        let player = resources
            .database
            .players()
            .get(auth.coach_id, player_id)
            .await?
            .ok_or_else(|| AppError::not_found("Player"))?;

        let history: Vec<HistoryEntry> = resources
            .database
            .stats()
            .history_for_player(auth.coach_id, player_id)
            .await?
            .into_iter()
            .map(HistoryEntry::from)
            .collect();

        Ok(Json(json!({ "player": player, "history": history })))
    }

    async fn team_summary(
        resources: &ServerResources,
        coach_id: Uuid,
        team: Team,
    ) -> AppResult<TeamSeasonSummary> {
        let db = &resources.database;
        let record = db.games().record_for_team(coach_id, team.id).await?;

        let mut player_points = Vec::new();
        if team.sport == Sport::Basketball {
            let mut totals: HashMap<Uuid, u32> = HashMap::new();
            for stat in db.stats().for_team(coach_id, team.id).await? {
                let total = totals.entry(stat.player_id).or_default();
                *total = total.saturating_add(stat.summary_points().unwrap_or(0));
            }
            player_points = db
                .players()
                .list_for_team(coach_id, team.id)
                .await?
                .into_iter()
                .map(|player| PlayerPoints {
                    points: totals.get(&player.id).copied().unwrap_or(0),
                    player_id: player.id,
                    name: player.name,
                })
                .collect();
            player_points.sort_by(|a, b| b.points.cmp(&a.points));
        }

        Ok(TeamSeasonSummary {
            team,
            games_played: record.played(),
            wins: record.wins,
            losses: record.losses,
            player_points,
        })
    }

    /// Handle GET /stats
    async fn handle_stats_page(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let teams = resources.database.teams().list(auth.coach_id).await?;

        let mut summaries = Vec::with_capacity(teams.len());
        for team in teams {
            summaries.push(Self::team_summary(&resources, auth.coach_id, team).await?);
        }

        Ok(pages::render("stats", json!({ "teams": summaries })))
    }
}
