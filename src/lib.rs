// ABOUTME: Main library entry point for the Brasserie restaurant management backend
// ABOUTME: Wires public/admin/employee HTTP APIs with the real-time staff notification hub
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

#![deny(unsafe_code)]

//! # Brasserie Server
//!
//! Backend for a small restaurant: public reservation and contact endpoints,
//! a menu catalogue, an admin dashboard API, an employee time-clock and
//! ordering panel, and a WebSocket notification hub that pushes business
//! events (orders, reservations, clock events, table-ready signals) to
//! role-filtered staff clients.
//!
//! ## Architecture
//!
//! - **Routes**: thin handlers - validate input, run parameterized SQL,
//!   return JSON, then fire hub notifications post-commit
//! - **Database**: a pooled single-file SQLite store behind one service struct
//! - **Hub**: in-memory connection registry with an authenticate-first
//!   handshake, a heartbeat sweep, and role-filtered fan-out
//! - **Email**: best-effort templated guest mail over an HTTP gateway
//!
//! ## Example
//!
//! ```rust,no_run
//! use brasserie_server::config::environment::ServerConfig;
//! use brasserie_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Brasserie configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary (src/bin/) and integration
// tests (tests/). They must remain `pub`.

/// JWT-based authentication and session management
pub mod auth;

/// On-disk database backups with integrity digests
pub mod backup;

/// Environment-based configuration management
pub mod config;

/// Application constants and tunables
pub mod constants;

/// Pooled SQLite storage and per-domain query implementations
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Authentication extraction and the declarative route policy table
pub mod middleware;

/// Common data models for restaurant domain objects
pub mod models;

/// Outbound guest notifications (templated email over an HTTP gateway)
pub mod notifications;

/// HTTP routes organized by domain
pub mod routes;

/// Server assembly: resource container, router construction, run loop
pub mod server;

/// WebSocket notification hub: registry, handshake, heartbeat, fan-out
pub mod websocket;
