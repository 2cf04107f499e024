// ABOUTME: Admin dashboard route handlers
// ABOUTME: Reservation decisions, contact inbox, menu CRUD, and staff management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Admin dashboard routes
//!
//! Everything under `/admin` is gated to the admin role by the route
//! policy table; handlers never re-check roles inline.

use crate::errors::AppError;
use crate::models::{ContactMessage, MenuItem, Reservation, ReservationStatus, User};
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Filter for the reservation list
#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    /// Optional status tag filter
    pub status: Option<String>,
    /// Optional window start on arrival time
    pub from: Option<DateTime<Utc>>,
    /// Optional window end on arrival time, exclusive
    pub to: Option<DateTime<Utc>>,
}

/// Reservation decision request
#[derive(Debug, Deserialize)]
pub struct UpdateReservationStatusRequest {
    /// Target status tag
    pub status: String,
}

/// Filter for the contact inbox
#[derive(Debug, Deserialize)]
pub struct ContactListQuery {
    /// Restrict to unread messages
    #[serde(default)]
    pub unread_only: bool,
}

/// Menu item create/update request
#[derive(Debug, Deserialize)]
pub struct MenuItemRequest {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Category heading
    pub category: String,
    /// Price in cents
    pub price_cents: i64,
    /// Availability on the public menu
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Staff activation request
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    /// New active flag
    pub is_active: bool,
}

/// Admin routes implementation
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin dashboard routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/admin/reservations", get(Self::handle_list_reservations))
            .route(
                "/admin/reservations/:id/status",
                put(Self::handle_update_reservation_status),
            )
            .route("/admin/contact", get(Self::handle_list_contact))
            .route("/admin/contact/:id/read", put(Self::handle_mark_contact_read))
            .route(
                "/admin/menu",
                get(Self::handle_list_menu).post(Self::handle_create_menu_item),
            )
            .route(
                "/admin/menu/:id",
                put(Self::handle_update_menu_item).delete(Self::handle_delete_menu_item),
            )
            .route("/admin/users", get(Self::handle_list_users))
            .route("/admin/users/:id/active", put(Self::handle_set_user_active))
            .with_state(resources)
    }

    /// List reservations with optional filters
    async fn handle_list_reservations(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ReservationListQuery>,
    ) -> Result<Json<Vec<Reservation>>, AppError> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<ReservationStatus>)
            .transpose()
            .map_err(|e| AppError::invalid_input(e.to_string()))?;

        let reservations = resources
            .database
            .list_reservations(status, query.from, query.to)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(reservations))
    }

    /// Decide on a reservation; confirmations and declines mail the guest
    async fn handle_update_reservation_status(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdateReservationStatusRequest>,
    ) -> Result<Json<Reservation>, AppError> {
        let status: ReservationStatus = request
            .status
            .parse()
            .map_err(|e: anyhow::Error| AppError::invalid_input(e.to_string()))?;

        resources
            .database
            .get_reservation(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Reservation {id}")))?;

        let reservation = resources
            .database
            .update_reservation_status(id, status)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(reservation_id = %id, status = status.as_str(), "reservation decided");

        // Best-effort guest mail, off the request path
        let email_service = resources.email.clone();
        let for_mail = reservation.clone();
        tokio::spawn(async move {
            if let Err(e) = email_service.send_reservation_decision(&for_mail).await {
                warn!(reservation_id = %for_mail.id, error = %e, "decision mail failed");
            }
        });

        Ok(Json(reservation))
    }

    /// List the contact inbox
    async fn handle_list_contact(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ContactListQuery>,
    ) -> Result<Json<Vec<ContactMessage>>, AppError> {
        let messages = resources
            .database
            .list_contact_messages(query.unread_only)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(messages))
    }

    /// Mark a contact message as read
    async fn handle_mark_contact_read(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<StatusCode, AppError> {
        resources
            .database
            .mark_contact_read(id)
            .await
            .map_err(|_| AppError::not_found(format!("Contact message {id}")))?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// List the full menu, including unavailable items
    async fn handle_list_menu(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Vec<MenuItem>>, AppError> {
        let items = resources
            .database
            .list_menu_items(false)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(items))
    }

    /// Add a menu item
    async fn handle_create_menu_item(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<MenuItemRequest>,
    ) -> Result<(StatusCode, Json<MenuItem>), AppError> {
        validate_menu_request(&request)?;

        let item = MenuItem {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            category: request.category,
            price_cents: request.price_cents,
            available: request.available,
            created_at: Utc::now(),
        };

        resources
            .database
            .create_menu_item(&item)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(item_id = %item.id, name = %item.name, "menu item created");
        Ok((StatusCode::CREATED, Json(item)))
    }

    /// Update a menu item
    async fn handle_update_menu_item(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<MenuItemRequest>,
    ) -> Result<Json<MenuItem>, AppError> {
        validate_menu_request(&request)?;

        let existing = resources
            .database
            .get_menu_item(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;

        let item = MenuItem {
            id,
            name: request.name,
            description: request.description,
            category: request.category,
            price_cents: request.price_cents,
            available: request.available,
            created_at: existing.created_at,
        };

        resources
            .database
            .update_menu_item(&item)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(Json(item))
    }

    /// Remove a menu item
    async fn handle_delete_menu_item(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<StatusCode, AppError> {
        resources
            .database
            .delete_menu_item(id)
            .await
            .map_err(|_| AppError::not_found(format!("Menu item {id}")))?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// List staff accounts
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Vec<User>>, AppError> {
        let users = resources
            .database
            .list_users()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(users))
    }

    /// Activate or deactivate a staff account
    async fn handle_set_user_active(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<SetActiveRequest>,
    ) -> Result<StatusCode, AppError> {
        resources
            .database
            .get_user(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("User {id}")))?;

        resources
            .database
            .set_user_active(id, request.is_active)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(user_id = %id, is_active = request.is_active, "staff account toggled");
        Ok(StatusCode::NO_CONTENT)
    }
}

fn validate_menu_request(request: &MenuItemRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() || request.category.trim().is_empty() {
        return Err(AppError::invalid_input("name and category must not be empty"));
    }
    if request.price_cents < 0 {
        return Err(AppError::invalid_input("price must not be negative"));
    }
    Ok(())
}
