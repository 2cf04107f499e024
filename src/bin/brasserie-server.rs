// ABOUTME: Production server binary for the Brasserie restaurant backend
// ABOUTME: Loads env config, initializes logging and storage, and runs the HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! # Brasserie Server Binary
//!
//! Starts the restaurant backend: HTTP API, WebSocket notification hub,
//! SQLite storage, and the heartbeat task, all from environment
//! configuration.

use anyhow::Result;
use brasserie_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::ServerConfig,
    database::Database,
    logging,
    server::{RestaurantServer, ServerResources},
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "brasserie-server")]
#[command(about = "Brasserie - restaurant management backend")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Brasserie Server");
    info!("{}", config.summary());

    // Initialize database (creates the file and schema on first run)
    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!(
        "Database ready: {}",
        config.database.url.to_connection_string()
    );

    // JWT secret from the environment, or a fresh one per process.
    // A generated secret invalidates sessions across restarts.
    let jwt_secret = config.auth.jwt_secret.as_ref().map_or_else(
        || {
            warn!("JWT_SECRET not set; generating an ephemeral secret");
            generate_jwt_secret().to_vec()
        },
        |secret| secret.as_bytes().to_vec(),
    );

    let auth_manager = AuthManager::new(jwt_secret, config.auth.jwt_expiry_hours as i64);
    info!("Authentication manager initialized");

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));
    let server = RestaurantServer::new(resources);

    display_available_endpoints(http_port);
    info!("Ready to serve");

    if let Err(e) = server.run(http_port).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

    info!("=== Available API Endpoints ===");
    info!("Public:");
    info!("   Health Check:      GET  http://{host}:{port}/health");
    info!("   Menu:              GET  http://{host}:{port}/menu");
    info!("   Reservation:       POST http://{host}:{port}/reservations");
    info!("   Contact:           POST http://{host}:{port}/contact");
    info!("   Staff Login:       POST http://{host}:{port}/auth/login");
    info!("   Notifications:     WS   ws://{host}:{port}/ws");
    info!("Employee:");
    info!("   Clock In/Out:      POST http://{host}:{port}/timeclock/in|out");
    info!("   Shift Listing:     GET  http://{host}:{port}/timeclock/entries");
    info!("   Orders:            POST http://{host}:{port}/orders");
    info!("   Order Status:      PUT  http://{host}:{port}/orders/{{id}}/status");
    info!("   Table Ready:       POST http://{host}:{port}/tables/{{number}}/ready");
    info!("Admin:");
    info!("   Register Staff:    POST http://{host}:{port}/auth/register");
    info!("   Reservations:      GET  http://{host}:{port}/admin/reservations");
    info!("   Decide:            PUT  http://{host}:{port}/admin/reservations/{{id}}/status");
    info!("   Contact Inbox:     GET  http://{host}:{port}/admin/contact");
    info!("   Menu Management:   POST http://{host}:{port}/admin/menu");
    info!("   Staff Accounts:    GET  http://{host}:{port}/admin/users");
    info!("   Reports:           GET  http://{host}:{port}/admin/reports/sales");
    info!("   Backups:           POST http://{host}:{port}/admin/backups");
    info!("=== End of Endpoint List ===");
}
