// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, resource, and user creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software
#![allow(dead_code)]

//! Shared test utilities for `brasserie_server`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use brasserie_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::environment::{DatabaseConfig, DatabaseUrl, ServerConfig},
    database::Database,
    models::{Role, User},
    server::{RestaurantServer, ServerResources},
};
use std::net::SocketAddr;
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup (in-memory)
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Create a test authentication manager with a fresh secret
pub fn create_test_auth_manager() -> Arc<AuthManager> {
    Arc::new(AuthManager::new(generate_jwt_secret().to_vec(), 24))
}

/// Create a staff user with a unique email and the given role
pub async fn create_test_user(database: &Database, role: Role) -> Result<User> {
    let user = User::new(
        format!("staff-{}@brasserie.example", Uuid::new_v4()),
        bcrypt::hash("correct horse battery", 4)?,
        Some("Test Staff".into()),
        role,
    );
    database.create_user(&user).await?;
    Ok(user)
}

/// Complete resource container over an in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    let auth_manager = AuthManager::new(generate_jwt_secret().to_vec(), 24);

    let config = ServerConfig {
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        ..ServerConfig::default()
    };

    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    )))
}

/// Serve the production router on an ephemeral port
pub async fn spawn_test_server(resources: &Arc<ServerResources>) -> Result<SocketAddr> {
    let router = RestaurantServer::router(resources);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}
