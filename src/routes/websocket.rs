// ABOUTME: WebSocket route handler for the staff notification hub
// ABOUTME: Upgrades the connection and hands the socket to the hub
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! WebSocket upgrade route
//!
//! The route itself is public; the hub enforces its own
//! authenticate-first handshake on the opened socket.

use crate::server::ServerResources;
use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::debug;

/// WebSocket routes implementation
pub struct WebSocketRoutes;

impl WebSocketRoutes {
    /// Create the WebSocket upgrade route
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ws", get(Self::handle_websocket))
            .with_state(resources)
    }

    /// Handle WebSocket upgrade and delegate the socket to the hub
    async fn handle_websocket(
        ws: WebSocketUpgrade,
        State(resources): State<Arc<ServerResources>>,
    ) -> impl IntoResponse {
        debug!("websocket connection request");
        let hub = resources.hub.clone();
        ws.on_upgrade(move |socket: WebSocket| async move {
            hub.handle_connection(socket).await;
        })
    }
}
