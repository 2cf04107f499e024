// ABOUTME: Public reservation route handler
// ABOUTME: Validates the request, stores it, notifies admins, and mails the guest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Public reservation endpoint
//!
//! Guests submit reservation requests here. The row is stored as pending,
//! admins get a `reservation_created` push, and the guest receives a
//! best-effort acknowledgement email.

use crate::constants::limits;
use crate::errors::AppError;
use crate::models::{EventKind, Reservation, ReservationStatus, Role};
use crate::routes::auth::is_valid_email;
use crate::server::ServerResources;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Public reservation request
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    /// Guest name
    pub name: String,
    /// Guest email for the confirmation mail
    pub email: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Number of guests
    pub party_size: i64,
    /// Requested arrival time
    pub reserved_for: DateTime<Utc>,
    /// Free-form note
    pub note: Option<String>,
}

/// Reservation routes implementation
pub struct ReservationRoutes;

impl ReservationRoutes {
    /// Create the public reservation route
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/reservations", post(Self::handle_create))
            .with_state(resources)
    }

    /// Handle a reservation submission
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CreateReservationRequest>,
    ) -> Result<(StatusCode, Json<Reservation>), AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::invalid_input("name must not be empty"));
        }
        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("invalid email address"));
        }
        if !(1..=limits::MAX_PARTY_SIZE).contains(&request.party_size) {
            return Err(AppError::invalid_input(format!(
                "party size must be between 1 and {}",
                limits::MAX_PARTY_SIZE
            )));
        }
        if request.reserved_for <= Utc::now() {
            return Err(AppError::invalid_input("reservation time must be in the future"));
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            party_size: request.party_size,
            reserved_for: request.reserved_for,
            note: request.note,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
        };

        resources
            .database
            .create_reservation(&reservation)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(
            reservation_id = %reservation.id,
            party_size = reservation.party_size,
            "reservation submitted"
        );

        // Post-commit: push to admins, fire-and-forget
        resources
            .hub
            .broadcast(
                EventKind::ReservationCreated,
                serde_json::json!({
                    "id": reservation.id,
                    "name": reservation.name,
                    "party_size": reservation.party_size,
                    "reserved_for": reservation.reserved_for.to_rfc3339(),
                }),
                &[Role::Admin],
            )
            .await;

        // Best-effort guest acknowledgement, off the request path
        let email_service = resources.email.clone();
        let for_mail = reservation.clone();
        tokio::spawn(async move {
            if let Err(e) = email_service.send_reservation_received(&for_mail).await {
                warn!(reservation_id = %for_mail.id, error = %e, "acknowledgement mail failed");
            }
        });

        Ok((StatusCode::CREATED, Json(reservation)))
    }
}
