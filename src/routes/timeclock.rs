// ABOUTME: Employee time-clock route handlers
// ABOUTME: Punch in/out with conflict checks and admin clock-event notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Time-clock routes for floor staff

use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::models::{EventKind, Role, TimeEntry};
use crate::server::ServerResources;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Window filter for shift listing
#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    /// Start of the window (default: 30 days ago)
    pub from: Option<DateTime<Utc>>,
    /// End of the window, exclusive (default: now)
    pub to: Option<DateTime<Utc>>,
}

/// Time-clock routes implementation
pub struct TimeclockRoutes;

impl TimeclockRoutes {
    /// Create all time-clock routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/timeclock/in", post(Self::handle_clock_in))
            .route("/timeclock/out", post(Self::handle_clock_out))
            .route("/timeclock/entries", get(Self::handle_entries))
            .with_state(resources)
    }

    /// Punch in
    async fn handle_clock_in(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
    ) -> Result<Json<TimeEntry>, AppError> {
        let open = resources
            .database
            .get_open_entry(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        if open.is_some() {
            return Err(AppError::conflict("already clocked in"));
        }

        let entry = resources
            .database
            .clock_in(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(employee = %auth.user_id, "clock in");
        Self::broadcast_clock_event(&resources, auth, "clock_in", &entry).await;

        Ok(Json(entry))
    }

    /// Punch out
    async fn handle_clock_out(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
    ) -> Result<Json<TimeEntry>, AppError> {
        let open = resources
            .database
            .get_open_entry(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::conflict("not clocked in"))?;

        let entry = resources
            .database
            .clock_out(open.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(employee = %auth.user_id, "clock out");
        Self::broadcast_clock_event(&resources, auth, "clock_out", &entry).await;

        Ok(Json(entry))
    }

    /// List the caller's shifts inside a window
    async fn handle_entries(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Query(query): Query<EntriesQuery>,
    ) -> Result<Json<Vec<TimeEntry>>, AppError> {
        let to = query.to.unwrap_or_else(Utc::now);
        let from = query.from.unwrap_or_else(|| to - Duration::days(30));

        let entries = resources
            .database
            .list_entries_for_employee(auth.user_id, from, to)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(entries))
    }

    /// Push the clock event to connected admins
    async fn broadcast_clock_event(
        resources: &Arc<ServerResources>,
        auth: AuthResult,
        action: &str,
        entry: &TimeEntry,
    ) {
        resources
            .hub
            .broadcast(
                EventKind::EmployeeClock,
                serde_json::json!({
                    "employee_id": auth.user_id,
                    "action": action,
                    "entry_id": entry.id,
                    "at": Utc::now().to_rfc3339(),
                }),
                &[Role::Admin],
            )
            .await;
    }
}
