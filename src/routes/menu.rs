// ABOUTME: Public menu route handler
// ABOUTME: Lists available menu items for the marketing site
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Public menu endpoint

use crate::errors::AppError;
use crate::models::MenuItem;
use crate::server::ServerResources;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Menu routes implementation
pub struct MenuRoutes;

impl MenuRoutes {
    /// Create the public menu route
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/menu", get(Self::handle_list))
            .with_state(resources)
    }

    /// List available menu items
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Vec<MenuItem>>, AppError> {
        let items = resources
            .database
            .list_menu_items(true)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(items))
    }
}
