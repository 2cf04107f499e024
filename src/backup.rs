// ABOUTME: On-disk database backups with integrity digests
// ABOUTME: Copies the SQLite file into a timestamped backup and lists prior copies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Database backups
//!
//! A backup is a plain copy of the single-file SQLite store into the
//! backup directory, named with a UTC timestamp and verified with a
//! SHA-256 digest of the copied bytes.

use crate::errors::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::info;

/// Metadata for one backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// File name inside the backup directory
    pub file_name: String,
    /// Size of the copy in bytes
    pub size_bytes: u64,
    /// SHA-256 of the copied bytes, hex-encoded (fresh backups only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// When the backup was taken
    pub created_at: DateTime<Utc>,
}

/// Backup service for the single-file database
#[derive(Clone)]
pub struct BackupService {
    /// Path of the live database file; None for in-memory databases
    database_path: Option<PathBuf>,
    backup_dir: PathBuf,
}

impl BackupService {
    /// Create the service
    #[must_use]
    pub const fn new(database_path: Option<PathBuf>, backup_dir: PathBuf) -> Self {
        Self {
            database_path,
            backup_dir,
        }
    }

    /// Copy the live database into a timestamped backup file
    ///
    /// # Errors
    ///
    /// Returns an error if the database is in-memory, or if the copy or
    /// digest read fails.
    pub async fn create_backup(&self) -> AppResult<BackupInfo> {
        let Some(source) = &self.database_path else {
            return Err(AppError::new(
                ErrorCode::StorageError,
                "cannot back up an in-memory database",
            ));
        };

        tokio::fs::create_dir_all(&self.backup_dir)
            .await
            .map_err(|e| storage_error("create backup directory", &e))?;

        let created_at = Utc::now();
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("database");
        let file_name = format!("{stem}-{}.db", created_at.format("%Y%m%dT%H%M%SZ"));
        let destination = self.backup_dir.join(&file_name);

        let size_bytes = tokio::fs::copy(source, &destination)
            .await
            .map_err(|e| storage_error("copy database file", &e))?;

        let bytes = tokio::fs::read(&destination)
            .await
            .map_err(|e| storage_error("read backup for digest", &e))?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        info!(
            file = %destination.display(),
            size_bytes,
            "database backup created"
        );

        Ok(BackupInfo {
            file_name,
            size_bytes,
            sha256: Some(sha256),
            created_at,
        })
    }

    /// List existing backups, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the backup directory cannot be read.
    pub async fn list_backups(&self) -> AppResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(&self.backup_dir)
            .await
            .map_err(|e| storage_error("read backup directory", &e))?;

        let mut backups = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error("read backup directory entry", &e))?
        {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(".db") {
                continue;
            }
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| storage_error("stat backup file", &e))?;
            let created_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            backups.push(BackupInfo {
                file_name,
                size_bytes: metadata.len(),
                sha256: None,
                created_at,
            });
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }
}

fn storage_error(action: &str, err: &std::io::Error) -> AppError {
    AppError::new(ErrorCode::StorageError, format!("failed to {action}: {err}"))
}
