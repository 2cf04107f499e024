// ABOUTME: Tests for the database backup service
// ABOUTME: Copies a file-backed store, verifies the digest, and rejects in-memory databases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::backup::BackupService;
use brasserie_server::database::Database;
use brasserie_server::models::Role;
use sha2::{Digest, Sha256};

#[tokio::test]
async fn test_backup_copies_database_with_matching_digest() -> Result<()> {
    common::init_test_logging();
    let workdir = tempfile::tempdir()?;
    let db_path = workdir.path().join("brasserie.db");
    let backup_dir = workdir.path().join("backups");

    let database = Database::new(&format!("sqlite:{}", db_path.display())).await?;
    common::create_test_user(&database, Role::Admin).await?;

    let service = BackupService::new(Some(db_path.clone()), backup_dir.clone());
    let info = service.create_backup().await?;

    let backup_path = backup_dir.join(&info.file_name);
    assert!(backup_path.exists());
    assert!(info.size_bytes > 0);

    // The reported digest matches the bytes on disk
    let bytes = std::fs::read(&backup_path)?;
    let digest = hex::encode(Sha256::digest(&bytes));
    assert_eq!(info.sha256.as_deref(), Some(digest.as_str()));

    // And the copy is byte-identical to the source
    let source_bytes = std::fs::read(&db_path)?;
    assert_eq!(hex::encode(Sha256::digest(&source_bytes)), digest);
    Ok(())
}

#[tokio::test]
async fn test_backup_listing_newest_first() -> Result<()> {
    common::init_test_logging();
    let workdir = tempfile::tempdir()?;
    let db_path = workdir.path().join("brasserie.db");
    let backup_dir = workdir.path().join("backups");

    let _database = Database::new(&format!("sqlite:{}", db_path.display())).await?;
    let service = BackupService::new(Some(db_path), backup_dir);

    assert!(service.list_backups().await?.is_empty());

    service.create_backup().await?;
    // Second backup lands in a later timestamp bucket
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    service.create_backup().await?;

    let backups = service.list_backups().await?;
    assert_eq!(backups.len(), 2);
    assert!(backups[0].created_at >= backups[1].created_at);
    Ok(())
}

#[tokio::test]
async fn test_in_memory_database_cannot_be_backed_up() {
    common::init_test_logging();
    let service = BackupService::new(None, std::env::temp_dir().join("brasserie-backups"));
    assert!(service.create_backup().await.is_err());
}
