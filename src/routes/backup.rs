// ABOUTME: Backup route handlers for the single-file database
// ABOUTME: Triggers timestamped copies and lists prior backups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Backup routes for the admin dashboard

use crate::backup::BackupInfo;
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;

/// Backup routes implementation
pub struct BackupRoutes;

impl BackupRoutes {
    /// Create all backup routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/admin/backups", post(Self::handle_create).get(Self::handle_list))
            .with_state(resources)
    }

    /// Take a backup now
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<(StatusCode, Json<BackupInfo>), AppError> {
        let info = resources.backups.create_backup().await?;
        Ok((StatusCode::CREATED, Json(info)))
    }

    /// List existing backups
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Vec<BackupInfo>>, AppError> {
        let backups = resources.backups.list_backups().await?;
        Ok(Json(backups))
    }
}
