// ABOUTME: Admin reporting route handlers
// ABOUTME: Thin wrappers over the parameterized SQL aggregation queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Reporting routes for the admin dashboard

use crate::database::{DailySales, EmployeeHours, ReservationCount, TopMenuItem};
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Default report window in days when no range is given
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Default size of the top-items ranking
const DEFAULT_TOP_LIMIT: i64 = 10;

/// Date window and ranking size for report queries
#[derive(Debug, Deserialize)]
pub struct ReportRangeQuery {
    /// Window start (default: 30 days before `to`)
    pub from: Option<DateTime<Utc>>,
    /// Window end, exclusive (default: now)
    pub to: Option<DateTime<Utc>>,
    /// Ranking size for top-item reports (default: 10)
    pub limit: Option<i64>,
}

impl ReportRangeQuery {
    fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = self.to.unwrap_or_else(Utc::now);
        let from = self
            .from
            .unwrap_or_else(|| to - Duration::days(DEFAULT_WINDOW_DAYS));
        (from, to)
    }
}

/// Report routes implementation
pub struct ReportRoutes;

impl ReportRoutes {
    /// Create all reporting routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/admin/reports/sales", get(Self::handle_sales))
            .route("/admin/reports/top-items", get(Self::handle_top_items))
            .route("/admin/reports/reservations", get(Self::handle_reservations))
            .route("/admin/reports/hours", get(Self::handle_hours))
            .with_state(resources)
    }

    /// Settled sales per day
    async fn handle_sales(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ReportRangeQuery>,
    ) -> Result<Json<Vec<DailySales>>, AppError> {
        let (from, to) = query.window();
        let report = resources
            .database
            .report_daily_sales(from, to)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(report))
    }

    /// Best-selling menu items
    async fn handle_top_items(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ReportRangeQuery>,
    ) -> Result<Json<Vec<TopMenuItem>>, AppError> {
        let (from, to) = query.window();
        let limit = query.limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, 100);
        let report = resources
            .database
            .report_top_menu_items(from, to, limit)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(report))
    }

    /// Reservation counts by status
    async fn handle_reservations(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ReportRangeQuery>,
    ) -> Result<Json<Vec<ReservationCount>>, AppError> {
        let (from, to) = query.window();
        let report = resources
            .database
            .report_reservation_counts(from, to)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(report))
    }

    /// Hours worked per employee
    async fn handle_hours(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ReportRangeQuery>,
    ) -> Result<Json<Vec<EmployeeHours>>, AppError> {
        let (from, to) = query.window();
        let report = resources
            .database
            .report_employee_hours(from, to)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        Ok(Json(report))
    }
}
