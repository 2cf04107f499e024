// ABOUTME: Public contact form route handler
// ABOUTME: Validates and stores messages for the admin inbox
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Public contact endpoint

use crate::errors::AppError;
use crate::models::ContactMessage;
use crate::routes::auth::is_valid_email;
use crate::server::ServerResources;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Public contact form request
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

/// Contact routes implementation
pub struct ContactRoutes;

impl ContactRoutes {
    /// Create the public contact route
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/contact", post(Self::handle_create))
            .with_state(resources)
    }

    /// Handle a contact form submission
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CreateContactRequest>,
    ) -> Result<(StatusCode, Json<ContactMessage>), AppError> {
        if request.name.trim().is_empty() || request.subject.trim().is_empty() {
            return Err(AppError::invalid_input("name and subject must not be empty"));
        }
        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("invalid email address"));
        }
        if request.body.trim().is_empty() {
            return Err(AppError::invalid_input("message body must not be empty"));
        }

        let message = ContactMessage {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            subject: request.subject,
            body: request.body,
            is_read: false,
            created_at: Utc::now(),
        };

        resources
            .database
            .create_contact_message(&message)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(message_id = %message.id, "contact message received");

        Ok((StatusCode::CREATED, Json(message)))
    }
}
