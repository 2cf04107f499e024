// ABOUTME: Authentication route handlers for staff login and registration
// ABOUTME: Thin handlers delegating password and token work to bcrypt and AuthManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Authentication routes for staff accounts
//!
//! Login is public; registration creates staff accounts and sits behind
//! the admin policy in the route table.

use crate::constants::{error_messages, limits};
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::server::ServerResources;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Staff registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Role for the new account
    pub role: Role,
}

/// Staff registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Id of the created account
    pub user_id: String,
    /// Human-readable confirmation
    pub message: String,
}

/// Staff login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// User info for the login response
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// Account id
    pub user_id: String,
    /// Login email
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Role tag
    pub role: String,
}

/// Staff login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests and the WebSocket handshake
    pub jwt_token: String,
    /// Token expiry as RFC3339
    pub expires_at: String,
    /// The authenticated account
    pub user: UserInfo,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/login", post(Self::handle_login))
            .route("/auth/register", post(Self::handle_register))
            .with_state(resources)
    }

    /// Handle staff login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AppError> {
        let user = resources
            .database
            .get_user_by_email_required(&request.email)
            .await
            .map_err(|_| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        // Verify password off the async executor; bcrypt is deliberately slow
        let password = request.password;
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!(email = %request.email, "login failed: bad password");
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        if !user.is_active {
            tracing::warn!(email = %request.email, "login blocked: deactivated account");
            return Err(AppError::auth_invalid(error_messages::ACCOUNT_DEACTIVATED));
        }

        resources
            .database
            .update_last_active(user.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let jwt_token = resources
            .auth_manager
            .generate_token(&user)
            .map_err(|e| AppError::internal(format!("token generation failed: {e}")))?;
        let expires_at = chrono::Utc::now()
            + chrono::Duration::hours(resources.config.auth.jwt_expiry_hours as i64);

        info!(email = %user.email, user_id = %user.id, "staff login");

        Ok(Json(LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                email: user.email,
                display_name: user.display_name,
                role: user.role.as_str().into(),
            },
        }))
    }

    /// Handle staff registration (admin-gated by the route policy)
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }
        if request.password.len() < limits::MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        if resources
            .database
            .get_user_by_email(&request.email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_some()
        {
            return Err(AppError::conflict(error_messages::USER_ALREADY_EXISTS));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))?;

        let user = User::new(
            request.email.clone(),
            password_hash,
            request.display_name,
            request.role,
        );
        let user_id = resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(email = %request.email, user_id = %user_id, role = %request.role, "staff account created");

        Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                user_id: user_id.to_string(),
                message: "Staff account created".into(),
            }),
        ))
    }
}

/// Validate email format
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    // Simple validation; the mail gateway is the real arbiter
    if email.len() <= 5 {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    email[at_pos + 1..].contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("staff@brasserie.example"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("no-at-sign.example"));
        assert!(!is_valid_email("@brasserie.example"));
        assert!(!is_valid_email("staff@"));
    }
}
