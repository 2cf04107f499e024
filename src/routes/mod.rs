// ABOUTME: Route module organization for the Brasserie HTTP endpoints
// ABOUTME: Centralized route definitions organized by domain with thin handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Route module for the Brasserie server
//!
//! Routes are organized by domain. Each module contains route definitions
//! and thin handler functions: validate input, call the database, return
//! JSON, then fire hub notifications post-commit.

/// Admin dashboard routes: reservations, contact inbox, menu, staff
pub mod admin;
/// Authentication routes: login and staff registration
pub mod auth;
/// Backup routes for the single-file database
pub mod backup;
/// Public contact form route
pub mod contact;
/// Health check and readiness routes
pub mod health;
/// Public menu route
pub mod menu;
/// Employee order routes and the table-ready signal
pub mod orders;
/// Admin reporting routes
pub mod reports;
/// Public reservation route
pub mod reservations;
/// Employee time-clock routes
pub mod timeclock;
/// WebSocket upgrade route for the notification hub
pub mod websocket;

/// Admin route handlers
pub use admin::AdminRoutes;
/// Authentication route handlers
pub use auth::AuthRoutes;
/// Login request payload
pub use auth::LoginRequest;
/// Login response with token
pub use auth::LoginResponse;
/// Staff registration request
pub use auth::RegisterRequest;
/// Registration response with user id
pub use auth::RegisterResponse;
/// Backup route handlers
pub use backup::BackupRoutes;
/// Contact route handlers
pub use contact::ContactRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Menu route handlers
pub use menu::MenuRoutes;
/// Order route handlers
pub use orders::OrderRoutes;
/// Report route handlers
pub use reports::ReportRoutes;
/// Reservation route handlers
pub use reservations::ReservationRoutes;
/// Time-clock route handlers
pub use timeclock::TimeclockRoutes;
/// WebSocket route handlers
pub use websocket::WebSocketRoutes;
