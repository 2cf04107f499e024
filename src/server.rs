// ABOUTME: Server assembly: dependency-injected resource container and router construction
// ABOUTME: Merges domain routers, applies layers, runs the listener with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Server assembly
//!
//! [`ServerResources`] is the explicit dependency container handed to every
//! route via axum state - there are no module-level globals. The hub, the
//! mail service, and the backup service all live here and share one
//! lifecycle with the HTTP listener.

use crate::auth::AuthManager;
use crate::backup::BackupService;
use crate::config::environment::ServerConfig;
use crate::constants::limits;
use crate::database::Database;
use crate::middleware::{authorize, AuthMiddleware, RoutePolicy};
use crate::notifications::EmailService;
use crate::routes::{
    AdminRoutes, AuthRoutes, BackupRoutes, ContactRoutes, HealthRoutes, MenuRoutes, OrderRoutes,
    ReportRoutes, ReservationRoutes, TimeclockRoutes, WebSocketRoutes,
};
use crate::websocket::NotificationHub;
use anyhow::Result;
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tokio::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Explicitly constructed service container shared by all routes
pub struct ServerResources {
    /// Pooled SQLite storage
    pub database: Database,
    /// Token generation and verification
    pub auth_manager: Arc<AuthManager>,
    /// Bearer-token request authentication
    pub auth_middleware: AuthMiddleware,
    /// Real-time staff notification hub
    pub hub: NotificationHub,
    /// Best-effort guest email
    pub email: EmailService,
    /// Database file backups
    pub backups: BackupService,
    /// Route-to-role authorization table
    pub policy: RoutePolicy,
    /// Environment configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wire up all services from the database, auth manager, and config
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let auth_manager = Arc::new(auth_manager);
        let auth_middleware = AuthMiddleware::new(auth_manager.clone(), database.clone());
        let hub = NotificationHub::new(
            auth_manager.clone(),
            Duration::from_secs(config.websocket.heartbeat_secs),
        );
        let email = EmailService::new(config.email.clone());
        let backups = BackupService::new(
            config.database.url.file_path().cloned(),
            config.backup.directory.clone(),
        );

        Self {
            database,
            auth_manager,
            auth_middleware,
            hub,
            email,
            backups,
            policy: RoutePolicy::standard(),
            config,
        }
    }
}

/// The restaurant HTTP + WebSocket server
pub struct RestaurantServer {
    resources: Arc<ServerResources>,
}

impl RestaurantServer {
    /// Create a server over an assembled resource container
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Build the complete router with all domain routes and layers.
    ///
    /// Exposed so integration tests can serve the exact production router
    /// on an ephemeral port.
    #[must_use]
    pub fn router(resources: &Arc<ServerResources>) -> Router {
        let cors = resources
            .config
            .cors_origin
            .as_deref()
            .and_then(|origin| origin.parse::<HeaderValue>().ok())
            .map_or_else(
                || {
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any)
                },
                |origin| {
                    CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods(Any)
                        .allow_headers(Any)
                },
            );

        Router::new()
            .merge(HealthRoutes::routes())
            .merge(AuthRoutes::routes(resources.clone()))
            .merge(ReservationRoutes::routes(resources.clone()))
            .merge(ContactRoutes::routes(resources.clone()))
            .merge(MenuRoutes::routes(resources.clone()))
            .merge(OrderRoutes::routes(resources.clone()))
            .merge(TimeclockRoutes::routes(resources.clone()))
            .merge(AdminRoutes::routes(resources.clone()))
            .merge(ReportRoutes::routes(resources.clone()))
            .merge(BackupRoutes::routes(resources.clone()))
            .merge(WebSocketRoutes::routes(resources.clone()))
            .layer(axum::middleware::from_fn_with_state(
                resources.clone(),
                authorize,
            ))
            // Outermost first: request ids wrap tracing so spans carry them
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(limits::MAX_REQUEST_BODY_BYTES))
                    .layer(cors),
            )
    }

    /// Run the server until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(&self, port: u16) -> Result<()> {
        // The hub's heartbeat shares the server lifecycle
        self.resources.hub.start_heartbeat();

        let router = Self::router(&self.resources);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
        info!("listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

/// Resolve when the process receives ctrl-c
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
