// ABOUTME: JSON routes for reading and saving attendance of one event
// ABOUTME: A save replaces the whole roster's attendance; omitted players become absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::{json_rejection, parse_path_id};
use crate::{database::RosterAttendance, errors::AppResult, resources::ServerResources};

/// Attendance save payload
///
/// Either form marks players present; when both are sent the present set is
/// their union.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendancePayload {
    /// Player id to present flag
    pub attendance: HashMap<String, bool>,
    /// Ids of present players
    pub present_player_ids: Vec<String>,
}

impl AttendancePayload {
    /// Ids marked present; unparseable ids are dropped
    #[must_use]
    pub fn present_set(&self) -> HashSet<Uuid> {
        let flagged = self
            .attendance
            .iter()
            .filter(|(_, present)| **present)
            .map(|(id, _)| id);

        flagged
            .chain(self.present_player_ids.iter())
            .filter_map(|raw| match Uuid::parse_str(raw.trim()) {
                Ok(id) => Some(id),
                Err(_) => {
                    debug!(raw = %raw, "Ignoring unparseable player id");
                    None
                }
            })
            .collect()
    }
}

/// Attendance of one event
#[derive(Debug, Serialize)]
pub struct EventAttendance {
    /// Event id
    pub event_id: Uuid,
    /// Team id
    pub team_id: Uuid,
    /// Current roster with present flags
    pub players: Vec<RosterAttendance>,
}

/// Attendance routes handler
pub struct AttendanceRoutes;

impl AttendanceRoutes {
    /// Create attendance routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/events/:id/attendance",
                get(Self::handle_get).post(Self::handle_save),
            )
            .with_state(resources)
    }

    /// Handle GET /api/events/:id/attendance
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_manager.authenticate_request(&headers)?;
        let event_id = parse_path_id(&id, "Event")?;
        let event = resources.database.events().require(auth.coach_id, event_id).await?;
        let players = resources
            .database
            .attendance()
            .for_event(auth.coach_id, &event)
            .await?;

        Ok(Json(EventAttendance {
            event_id: event.id,
            team_id: event.team_id,
            players,
        }))
    }

    /// Handle POST /api/events/:id/attendance
    #[tracing::instrument(skip(resources, headers, payload), fields(route = "attendance_save"))]
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        payload: Result<Json<AttendancePayload>, JsonRejection>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_manager.authenticate_request(&headers)?;
        let event_id = parse_path_id(&id, "Event")?;
        let Json(payload) = payload.map_err(|rejection| json_rejection(&rejection))?;
        let event = resources.database.events().require(auth.coach_id, event_id).await?;

        let updated = resources
            .database
            .attendance()
            .save(auth.coach_id, &event, &payload.present_set())
            .await?;

        Ok(Json(json!({ "success": true, "updated": updated })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_set_unions_both_forms() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let payload = AttendancePayload {
            attendance: HashMap::from([(a.to_string(), true), (b.to_string(), false)]),
            present_player_ids: vec![c.to_string(), "not-an-id".to_owned()],
        };

        let present = payload.present_set();
        assert_eq!(present, HashSet::from([a, c]));
    }

    #[test]
    fn test_empty_payload_marks_nobody_present() {
        assert!(AttendancePayload::default().present_set().is_empty());
    }
}
