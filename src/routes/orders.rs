// ABOUTME: Employee order route handlers and the table-ready signal
// ABOUTME: Creates orders with price snapshots, tracks status, and fans out hub events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Order routes for floor staff
//!
//! All routes here sit behind the employee policy. After a state change
//! commits, the matching hub event is broadcast fire-and-forget; an order
//! turning ready additionally signals the employee who placed it.

use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::models::{EventKind, Order, OrderItem, OrderStatus, Role};
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One requested line of a new order
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    /// Menu item to order
    pub menu_item_id: Uuid,
    /// Quantity, at least 1
    pub quantity: i64,
}

/// New order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Physical table number
    pub table_number: i64,
    /// Free-form kitchen note
    pub note: Option<String>,
    /// Lines; must not be empty
    pub items: Vec<OrderItemRequest>,
}

/// Status transition request
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    /// Target status tag
    pub status: String,
}

/// Filter for order listing
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// Optional status tag filter
    pub status: Option<String>,
}

/// An order with its line items
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// The order row
    #[serde(flatten)]
    pub order: Order,
    /// Line items
    pub items: Vec<OrderItem>,
    /// Sum over line totals
    pub total_cents: i64,
}

impl OrderResponse {
    fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let total_cents = items.iter().map(|i| i.price_cents * i.quantity).sum();
        Self {
            order,
            items,
            total_cents,
        }
    }
}

/// Order routes implementation
pub struct OrderRoutes;

impl OrderRoutes {
    /// Create all order routes plus the table-ready signal
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/orders", post(Self::handle_create).get(Self::handle_list))
            .route("/orders/:id", get(Self::handle_get))
            .route("/orders/:id/status", put(Self::handle_update_status))
            .route("/tables/:number/ready", post(Self::handle_table_ready))
            .with_state(resources)
    }

    /// Take a new order for a table
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Json(request): Json<CreateOrderRequest>,
    ) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
        if request.table_number < 1 {
            return Err(AppError::invalid_input("table number must be positive"));
        }
        if request.items.is_empty() {
            return Err(AppError::invalid_input("an order needs at least one item"));
        }

        let order_id = Uuid::new_v4();
        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            if line.quantity < 1 {
                return Err(AppError::invalid_input("item quantity must be at least 1"));
            }
            let menu_item = resources
                .database
                .get_menu_item(line.menu_item_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .ok_or_else(|| AppError::not_found(format!("Menu item {}", line.menu_item_id)))?;
            if !menu_item.available {
                return Err(AppError::invalid_input(format!(
                    "menu item '{}' is currently unavailable",
                    menu_item.name
                )));
            }
            items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id,
                menu_item_id: menu_item.id,
                quantity: line.quantity,
                // Price snapshot: later menu edits must not reprice open orders
                price_cents: menu_item.price_cents,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: order_id,
            table_number: request.table_number,
            placed_by: auth.user_id,
            status: OrderStatus::Open,
            note: request.note,
            created_at: now,
            updated_at: now,
        };

        resources
            .database
            .create_order(&order, &items)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let response = OrderResponse::new(order, items);
        info!(
            order_id = %order_id,
            table = response.order.table_number,
            total_cents = response.total_cents,
            "order created"
        );

        resources
            .hub
            .broadcast(
                EventKind::OrderCreated,
                serde_json::json!({
                    "id": response.order.id,
                    "table_number": response.order.table_number,
                    "total_cents": response.total_cents,
                    "item_count": response.items.len(),
                }),
                &[Role::Admin, Role::Employee],
            )
            .await;

        Ok((StatusCode::CREATED, Json(response)))
    }

    /// List orders, optionally by status
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<OrderListQuery>,
    ) -> Result<Json<Vec<Order>>, AppError> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<OrderStatus>)
            .transpose()
            .map_err(|e| AppError::invalid_input(e.to_string()))?;

        let orders = resources
            .database
            .list_orders(status)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(orders))
    }

    /// Fetch one order with its items
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<OrderResponse>, AppError> {
        let (order, items) = resources
            .database
            .get_order(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
        Ok(Json(OrderResponse::new(order, items)))
    }

    /// Transition an order's status
    async fn handle_update_status(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(request): Json<UpdateOrderStatusRequest>,
    ) -> Result<Json<Order>, AppError> {
        let status: OrderStatus = request
            .status
            .parse()
            .map_err(|e: anyhow::Error| AppError::invalid_input(e.to_string()))?;

        // Existence check first so a bad id is a clean 404
        resources
            .database
            .get_order(id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;

        let order = resources
            .database
            .update_order_status(id, status)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(order_id = %id, status = status.as_str(), "order status updated");

        resources
            .hub
            .broadcast(
                EventKind::OrderUpdated,
                serde_json::json!({
                    "id": order.id,
                    "table_number": order.table_number,
                    "status": order.status.as_str(),
                }),
                &[Role::Admin, Role::Employee],
            )
            .await;

        if status == OrderStatus::Ready {
            let payload = serde_json::json!({
                "table_number": order.table_number,
                "order_id": order.id,
            });
            resources
                .hub
                .broadcast(
                    EventKind::TableReady,
                    payload.clone(),
                    &[Role::Admin, Role::Employee],
                )
                .await;
            // Nudge the employee who took the order, if they are connected
            resources
                .hub
                .notify(order.placed_by, EventKind::TableReady, payload)
                .await;
        }

        Ok(Json(order))
    }

    /// Manual table-ready signal from the floor
    async fn handle_table_ready(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(number): Path<i64>,
    ) -> Result<StatusCode, AppError> {
        if number < 1 {
            return Err(AppError::invalid_input("table number must be positive"));
        }

        info!(table = number, signalled_by = %auth.user_id, "table ready signal");

        resources
            .hub
            .broadcast(
                EventKind::TableReady,
                serde_json::json!({ "table_number": number }),
                &[Role::Admin, Role::Employee],
            )
            .await;

        Ok(StatusCode::NO_CONTENT)
    }
}
