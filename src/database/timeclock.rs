// ABOUTME: Employee time-clock database operations
// ABOUTME: Punch in/out with one open shift per employee and range queries for payroll
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use super::{parse_datetime, parse_uuid, Database};
use crate::models::TimeEntry;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the time entries table
    pub(super) async fn migrate_timeclock(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS time_entries (
                id TEXT PRIMARY KEY,
                employee_id TEXT NOT NULL REFERENCES users(id),
                clock_in TEXT NOT NULL,
                clock_out TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_time_entries_employee ON time_entries(employee_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Punch in: open a new shift
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn clock_in(&self, employee_id: Uuid) -> Result<TimeEntry> {
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            employee_id,
            clock_in: Utc::now(),
            clock_out: None,
        };

        sqlx::query(
            r"
            INSERT INTO time_entries (id, employee_id, clock_in, clock_out)
            VALUES (?, ?, ?, NULL)
            ",
        )
        .bind(entry.id.to_string())
        .bind(entry.employee_id.to_string())
        .bind(entry.clock_in.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Punch out: close the given shift
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or is already closed.
    pub async fn clock_out(&self, entry_id: Uuid) -> Result<TimeEntry> {
        let now = Utc::now();
        let result =
            sqlx::query("UPDATE time_entries SET clock_out = ? WHERE id = ? AND clock_out IS NULL")
                .bind(now.to_rfc3339())
                .bind(entry_id.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("no open time entry with id {entry_id}"));
        }

        let row = sqlx::query("SELECT * FROM time_entries WHERE id = ?")
            .bind(entry_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        row_to_entry(&row)
    }

    /// The employee's currently open shift, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn get_open_entry(&self, employee_id: Uuid) -> Result<Option<TimeEntry>> {
        let row = sqlx::query(
            "SELECT * FROM time_entries WHERE employee_id = ? AND clock_out IS NULL LIMIT 1",
        )
        .bind(employee_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_entry).transpose()
    }

    /// Shifts for one employee with clock-in inside the window
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub async fn list_entries_for_employee(
        &self,
        employee_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM time_entries
            WHERE employee_id = ? AND clock_in >= ? AND clock_in < ?
            ORDER BY clock_in DESC
            ",
        )
        .bind(employee_id.to_string())
        .bind(from.to_rfc3339())
        .bind(to.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<TimeEntry> {
    let id_raw: String = row.try_get("id")?;
    let employee_raw: String = row.try_get("employee_id")?;
    let in_raw: String = row.try_get("clock_in")?;
    let out_raw: Option<String> = row.try_get("clock_out")?;

    Ok(TimeEntry {
        id: parse_uuid(&id_raw)?,
        employee_id: parse_uuid(&employee_raw)?,
        clock_in: parse_datetime(&in_raw)?,
        clock_out: out_raw.as_deref().map(parse_datetime).transpose()?,
    })
}
