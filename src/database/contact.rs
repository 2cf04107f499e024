// ABOUTME: Contact form database operations
// ABOUTME: Stores public contact messages and tracks the admin read flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use super::{parse_datetime, parse_uuid, Database};
use crate::models::ContactMessage;
use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the contact messages table
    pub(super) async fn migrate_contact(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS contact_messages (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a contact message
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_contact_message(&self, message: &ContactMessage) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO contact_messages (id, name, email, subject, body, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(message.id.to_string())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.is_read)
        .bind(message.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(message.id)
    }

    /// List contact messages, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn list_contact_messages(&self, unread_only: bool) -> Result<Vec<ContactMessage>> {
        let sql = if unread_only {
            "SELECT * FROM contact_messages WHERE is_read = 0 ORDER BY created_at DESC"
        } else {
            "SELECT * FROM contact_messages ORDER BY created_at DESC"
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_message).collect()
    }

    /// Mark a contact message as read
    ///
    /// # Errors
    ///
    /// Returns an error if the message does not exist or the update fails.
    pub async fn mark_contact_read(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE contact_messages SET is_read = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("no contact message with id {id}"));
        }
        Ok(())
    }
}

fn row_to_message(row: &SqliteRow) -> Result<ContactMessage> {
    let id_raw: String = row.try_get("id")?;
    let created_raw: String = row.try_get("created_at")?;

    Ok(ContactMessage {
        id: parse_uuid(&id_raw)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        subject: row.try_get("subject")?,
        body: row.try_get("body")?,
        is_read: row.try_get("is_read")?,
        created_at: parse_datetime(&created_raw)?,
    })
}
