// ABOUTME: Declarative route authorization evaluated by a single middleware
// ABOUTME: Maps path prefixes to required roles; handlers never check roles inline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Route Authorization Policy
//!
//! Instead of per-route role checks scattered through handlers, one table
//! maps path prefixes to the role required to reach them, and one
//! [`authorize`] middleware evaluates it. Paths without an entry are
//! public. Admin outranks employee.

use crate::errors::AppError;
use crate::models::Role;
use crate::server::ServerResources;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// The route-to-role policy table
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// (path prefix, required role), longest prefix wins
    rules: Vec<(&'static str, Role)>,
}

impl RoutePolicy {
    /// The standard policy for this server
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                ("/auth/register", Role::Admin),
                ("/admin", Role::Admin),
                ("/orders", Role::Employee),
                ("/timeclock", Role::Employee),
                ("/tables", Role::Employee),
            ],
        }
    }

    /// An empty policy (everything public); used by tests
    #[must_use]
    pub const fn open() -> Self {
        Self { rules: Vec::new() }
    }

    /// Role required to reach `path`, if any
    #[must_use]
    pub fn required_role(&self, path: &str) -> Option<Role> {
        self.rules
            .iter()
            .filter(|(prefix, _)| {
                path == *prefix
                    || (path.starts_with(prefix)
                        && path[prefix.len()..].starts_with('/'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, role)| *role)
    }
}

/// Authorization middleware consulting the policy table.
///
/// Public paths pass through untouched. Guarded paths are authenticated
/// and the verified identity is inserted into request extensions for
/// handlers that need it.
///
/// # Errors
///
/// Returns 401 for missing/invalid credentials, 403 when the role does
/// not meet the table's requirement.
pub async fn authorize(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(required) = resources.policy.required_role(request.uri().path()) else {
        return Ok(next.run(request).await);
    };

    let auth = resources
        .auth_middleware
        .authenticate_request(request.headers())
        .await?;

    if !auth.role.meets(required) {
        tracing::warn!(
            user_id = %auth.user_id,
            role = %auth.role,
            path = request.uri().path(),
            "request rejected by route policy"
        );
        return Err(AppError::permission_denied(format!(
            "{required} role required"
        )));
    }

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}
