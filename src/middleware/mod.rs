// ABOUTME: Middleware module for request authentication and authorization
// ABOUTME: Bearer-token extraction plus the declarative route policy table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! HTTP middleware: authentication extraction and route authorization

/// Bearer token authentication against staff accounts
pub mod auth;

/// Declarative route-to-role policy table and the authorization layer
pub mod policy;

pub use auth::AuthMiddleware;
pub use policy::{authorize, RoutePolicy};
