// ABOUTME: Pooled SQLite storage behind a single Database service struct
// ABOUTME: Owns the connection pool, runs idempotent migrations, hosts shared row helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! # Database Management
//!
//! Single-file SQLite storage for the restaurant. One [`Database`] service
//! owns the pool; per-domain files contribute `impl Database` blocks with
//! parameterized queries. Connections are borrowed from the pool per
//! statement and released on every exit path.

mod contact;
mod menu;
mod orders;
mod reports;
mod reservations;
mod timeclock;
mod users;

pub use reports::{DailySales, EmployeeHours, ReservationCount, TopMenuItem};

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

/// Database manager for restaurant storage
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be opened or a migration
    /// statement fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Pooled in-memory connections each get a private database, so the
        // pool must stay at one connection for schema to be visible at all.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run idempotent schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_reservations().await?;
        self.migrate_contact().await?;
        self.migrate_menu().await?;
        self.migrate_orders().await?;
        self.migrate_timeclock().await?;
        Ok(())
    }
}

/// Parse a TEXT uuid column
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid> {
    Ok(Uuid::parse_str(raw)?)
}

/// Parse an RFC3339 TEXT timestamp column
pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
