// ABOUTME: Reporting queries: parameterized SQL aggregations over orders, reservations, shifts
// ABOUTME: Produces daily sales, top items, reservation counts, and hours worked
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use super::Database;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

/// Settled sales for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySales {
    /// Day in YYYY-MM-DD form
    pub day: String,
    /// Sum of line totals on paid orders
    pub total_cents: i64,
    /// Number of paid orders
    pub orders: i64,
}

/// A menu item ranked by quantity sold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopMenuItem {
    /// Menu item id
    pub menu_item_id: Uuid,
    /// Item name at query time
    pub name: String,
    /// Units sold on paid orders
    pub quantity: i64,
    /// Revenue from those units
    pub revenue_cents: i64,
}

/// Reservation tally for one status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCount {
    /// Status tag
    pub status: String,
    /// Reservations in that status inside the window
    pub count: i64,
}

/// Hours worked by one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeHours {
    /// Employee id
    pub employee_id: Uuid,
    /// Login email, for display
    pub email: String,
    /// Total hours across closed shifts in the window
    pub hours: f64,
}

impl Database {
    /// Settled sales per day over a window (paid orders only)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn report_daily_sales(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailySales>> {
        let rows = sqlx::query(
            r"
            SELECT substr(o.created_at, 1, 10) AS day,
                   SUM(oi.price_cents * oi.quantity) AS total_cents,
                   COUNT(DISTINCT o.id) AS orders
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            WHERE o.status = 'paid' AND o.created_at >= ? AND o.created_at < ?
            GROUP BY day
            ORDER BY day
            ",
        )
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(DailySales {
                    day: row.try_get("day")?,
                    total_cents: row.try_get("total_cents")?,
                    orders: row.try_get("orders")?,
                })
            })
            .collect()
    }

    /// Best-selling menu items over a window (paid orders only)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn report_top_menu_items(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopMenuItem>> {
        let rows = sqlx::query(
            r"
            SELECT oi.menu_item_id AS menu_item_id,
                   m.name AS name,
                   SUM(oi.quantity) AS quantity,
                   SUM(oi.price_cents * oi.quantity) AS revenue_cents
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN menu_items m ON m.id = oi.menu_item_id
            WHERE o.status = 'paid' AND o.created_at >= ? AND o.created_at < ?
            GROUP BY oi.menu_item_id, m.name
            ORDER BY quantity DESC
            LIMIT ?
            ",
        )
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id_raw: String = row.try_get("menu_item_id")?;
                Ok(TopMenuItem {
                    menu_item_id: super::parse_uuid(&id_raw)?,
                    name: row.try_get("name")?,
                    quantity: row.try_get("quantity")?,
                    revenue_cents: row.try_get("revenue_cents")?,
                })
            })
            .collect()
    }

    /// Reservation counts by status over an arrival window
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn report_reservation_counts(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ReservationCount>> {
        let rows = sqlx::query(
            r"
            SELECT status, COUNT(*) AS count
            FROM reservations
            WHERE reserved_for >= ? AND reserved_for < ?
            GROUP BY status
            ORDER BY status
            ",
        )
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ReservationCount {
                    status: row.try_get("status")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    /// Hours worked per employee over a window (closed shifts only)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn report_employee_hours(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EmployeeHours>> {
        let rows = sqlx::query(
            r"
            SELECT t.employee_id AS employee_id,
                   u.email AS email,
                   SUM((julianday(t.clock_out) - julianday(t.clock_in)) * 24.0) AS hours
            FROM time_entries t
            JOIN users u ON u.id = t.employee_id
            WHERE t.clock_out IS NOT NULL AND t.clock_in >= ? AND t.clock_in < ?
            GROUP BY t.employee_id, u.email
            ORDER BY hours DESC
            ",
        )
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id_raw: String = row.try_get("employee_id")?;
                Ok(EmployeeHours {
                    employee_id: super::parse_uuid(&id_raw)?,
                    email: row.try_get("email")?,
                    hours: row.try_get("hours")?,
                })
            })
            .collect()
    }
}
