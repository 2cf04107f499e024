// ABOUTME: Menu catalogue database operations
// ABOUTME: CRUD for menu items; the public site sees only available items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use super::{parse_datetime, parse_uuid, Database};
use crate::models::MenuItem;
use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the menu items table
    pub(super) async fn migrate_menu(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS menu_items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                category TEXT NOT NULL,
                price_cents INTEGER NOT NULL,
                available BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_menu_items_category ON menu_items(category)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a menu item
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_menu_item(&self, item: &MenuItem) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO menu_items (id, name, description, category, price_cents, available, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.available)
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(item.id)
    }

    /// Fetch a menu item by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        let row = sqlx::query("SELECT * FROM menu_items WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_item).transpose()
    }

    /// List menu items grouped for display, optionally only available ones
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn list_menu_items(&self, available_only: bool) -> Result<Vec<MenuItem>> {
        let sql = if available_only {
            "SELECT * FROM menu_items WHERE available = 1 ORDER BY category, name"
        } else {
            "SELECT * FROM menu_items ORDER BY category, name"
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_item).collect()
    }

    /// Update name, description, category, price, and availability
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the update fails.
    pub async fn update_menu_item(&self, item: &MenuItem) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE menu_items
            SET name = ?, description = ?, category = ?, price_cents = ?, available = ?
            WHERE id = ?
            ",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(item.price_cents)
        .bind(item.available)
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("no menu item with id {}", item.id));
        }
        Ok(())
    }

    /// Delete a menu item
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the delete fails.
    pub async fn delete_menu_item(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("no menu item with id {id}"));
        }
        Ok(())
    }
}

fn row_to_item(row: &SqliteRow) -> Result<MenuItem> {
    let id_raw: String = row.try_get("id")?;
    let created_raw: String = row.try_get("created_at")?;

    Ok(MenuItem {
        id: parse_uuid(&id_raw)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        price_cents: row.try_get("price_cents")?,
        available: row.try_get("available")?,
        created_at: parse_datetime(&created_raw)?,
    })
}
