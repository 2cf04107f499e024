// ABOUTME: Order database operations
// ABOUTME: Transactional order creation with line items, listing, and status transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use super::{parse_datetime, parse_uuid, Database};
use crate::models::{Order, OrderItem, OrderStatus};
use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the orders and order items tables
    pub(super) async fn migrate_orders(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                table_number INTEGER NOT NULL,
                placed_by TEXT NOT NULL REFERENCES users(id),
                status TEXT NOT NULL DEFAULT 'open'
                    CHECK (status IN ('open', 'preparing', 'ready', 'served', 'paid', 'cancelled')),
                note TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS order_items (
                id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
                menu_item_id TEXT NOT NULL REFERENCES menu_items(id),
                quantity INTEGER NOT NULL,
                price_cents INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert an order and its line items in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; the transaction rolls back.
    pub async fn create_order(&self, order: &Order, items: &[OrderItem]) -> Result<Uuid> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO orders (id, table_number, placed_by, status, note, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(order.id.to_string())
        .bind(order.table_number)
        .bind(order.placed_by.to_string())
        .bind(order.status.as_str())
        .bind(&order.note)
        .bind(order.created_at.to_rfc3339())
        .bind(order.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_items (id, order_id, menu_item_id, quantity, price_cents)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(item.id.to_string())
            .bind(item.order_id.to_string())
            .bind(item.menu_item_id.to_string())
            .bind(item.quantity)
            .bind(item.price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order.id)
    }

    /// Fetch an order and its line items
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn get_order(&self, id: Uuid) -> Result<Option<(Order, Vec<OrderItem>)>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = row_to_order(&row)?;

        let item_rows = sqlx::query("SELECT * FROM order_items WHERE order_id = ?")
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await?;
        let items = item_rows
            .iter()
            .map(row_to_order_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some((order, items)))
    }

    /// List orders, optionally filtered by status, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let rows = if let Some(status) = status {
            sqlx::query("SELECT * FROM orders WHERE status = ? ORDER BY created_at DESC")
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query("SELECT * FROM orders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?
        };

        rows.iter().map(row_to_order).collect()
    }

    /// List unsettled orders for one table
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn list_open_orders_for_table(&self, table_number: i64) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM orders
            WHERE table_number = ? AND status NOT IN ('paid', 'cancelled')
            ORDER BY created_at ASC
            ",
        )
        .bind(table_number)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }

    /// Transition an order to a new status, returning the updated row
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the update fails.
    pub async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("no order with id {id}"));
        }

        let row = sqlx::query("SELECT * FROM orders WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;
        row_to_order(&row)
    }
}

fn row_to_order(row: &SqliteRow) -> Result<Order> {
    let id_raw: String = row.try_get("id")?;
    let placed_by_raw: String = row.try_get("placed_by")?;
    let status_raw: String = row.try_get("status")?;
    let created_raw: String = row.try_get("created_at")?;
    let updated_raw: String = row.try_get("updated_at")?;

    Ok(Order {
        id: parse_uuid(&id_raw)?,
        table_number: row.try_get("table_number")?,
        placed_by: parse_uuid(&placed_by_raw)?,
        status: status_raw.parse()?,
        note: row.try_get("note")?,
        created_at: parse_datetime(&created_raw)?,
        updated_at: parse_datetime(&updated_raw)?,
    })
}

fn row_to_order_item(row: &SqliteRow) -> Result<OrderItem> {
    let id_raw: String = row.try_get("id")?;
    let order_raw: String = row.try_get("order_id")?;
    let item_raw: String = row.try_get("menu_item_id")?;

    Ok(OrderItem {
        id: parse_uuid(&id_raw)?,
        order_id: parse_uuid(&order_raw)?,
        menu_item_id: parse_uuid(&item_raw)?,
        quantity: row.try_get("quantity")?,
        price_cents: row.try_get("price_cents")?,
    })
}
