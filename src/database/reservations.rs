// ABOUTME: Reservation database operations
// ABOUTME: Handles guest reservation creation, listing with filters, and status transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use super::{parse_datetime, parse_uuid, Database};
use crate::models::{Reservation, ReservationStatus};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the reservations table
    pub(super) async fn migrate_reservations(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS reservations (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT,
                party_size INTEGER NOT NULL,
                reserved_for TEXT NOT NULL,
                note TEXT,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'confirmed', 'declined', 'cancelled', 'seated')),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reservations_reserved_for ON reservations(reserved_for)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a reservation
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_reservation(&self, reservation: &Reservation) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO reservations (id, name, email, phone, party_size, reserved_for, note, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(reservation.id.to_string())
        .bind(&reservation.name)
        .bind(&reservation.email)
        .bind(&reservation.phone)
        .bind(reservation.party_size)
        .bind(reservation.reserved_for.to_rfc3339())
        .bind(&reservation.note)
        .bind(reservation.status.as_str())
        .bind(reservation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(reservation.id)
    }

    /// Fetch a reservation by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn get_reservation(&self, id: Uuid) -> Result<Option<Reservation>> {
        let row = sqlx::query("SELECT * FROM reservations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_reservation).transpose()
    }

    /// List reservations, optionally filtered by status and arrival window
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Reservation>> {
        let mut sql = String::from("SELECT * FROM reservations WHERE 1=1");
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if from.is_some() {
            sql.push_str(" AND reserved_for >= ?");
        }
        if to.is_some() {
            sql.push_str(" AND reserved_for < ?");
        }
        sql.push_str(" ORDER BY reserved_for ASC");

        let mut query = sqlx::query(&sql);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        if let Some(from) = from {
            query = query.bind(from.to_rfc3339());
        }
        if let Some(to) = to {
            query = query.bind(to.to_rfc3339());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_reservation).collect()
    }

    /// Transition a reservation to a new status, returning the updated row
    ///
    /// # Errors
    ///
    /// Returns an error if the reservation does not exist or the update fails.
    pub async fn update_reservation_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let result = sqlx::query("UPDATE reservations SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("no reservation with id {id}"));
        }

        self.get_reservation(id)
            .await?
            .ok_or_else(|| anyhow!("reservation {id} vanished mid-update"))
    }
}

fn row_to_reservation(row: &SqliteRow) -> Result<Reservation> {
    let id_raw: String = row.try_get("id")?;
    let status_raw: String = row.try_get("status")?;
    let reserved_raw: String = row.try_get("reserved_for")?;
    let created_raw: String = row.try_get("created_at")?;

    Ok(Reservation {
        id: parse_uuid(&id_raw)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        party_size: row.try_get("party_size")?,
        reserved_for: parse_datetime(&reserved_raw)?,
        note: row.try_get("note")?,
        status: status_raw.parse()?,
        created_at: parse_datetime(&created_raw)?,
    })
}
