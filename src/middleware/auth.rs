// ABOUTME: Request authentication middleware for bearer-token extraction
// ABOUTME: Verifies JWTs and resolves the account, rejecting deactivated users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use crate::auth::{AuthManager, AuthResult, JwtValidationError};
use crate::constants::error_messages;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use std::sync::Arc;

/// Middleware for staff request authentication
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    database: Database,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>, database: Database) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns an error if the Authorization header is missing or
    /// malformed, the token fails validation, or the account has been
    /// deactivated.
    pub async fn authenticate_request(
        &self,
        headers: &axum::http::HeaderMap,
    ) -> AppResult<AuthResult> {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            tracing::warn!("authentication failed: header is not a bearer token");
            return Err(AppError::auth_invalid(
                "Invalid authorization header format - must be 'Bearer <token>'",
            ));
        };

        let auth = self.auth_manager.verify(token).map_err(|e| match e {
            JwtValidationError::TokenExpired { .. } => AppError::auth_expired(),
            other => AppError::auth_invalid(format!("JWT validation failed: {other}")),
        })?;

        // The token may outlive the account; deactivated staff stay out.
        let user = self
            .database
            .get_user(auth.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::auth_invalid("Unknown user in token"))?;

        if !user.is_active {
            tracing::warn!(user_id = %auth.user_id, "rejected request from deactivated account");
            return Err(AppError::auth_invalid(error_messages::ACCOUNT_DEACTIVATED));
        }

        Ok(auth)
    }
}
