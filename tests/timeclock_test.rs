// ABOUTME: Database tests for the employee time clock
// ABOUTME: Covers punch in/out, single open shift, and range listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::models::Role;
use chrono::{Duration, Utc};
use uuid::Uuid;

#[tokio::test]
async fn test_clock_in_then_out() -> Result<()> {
    let database = common::create_test_database().await?;
    let employee = common::create_test_user(&database, Role::Employee).await?;

    let entry = database.clock_in(employee.id).await?;
    assert!(entry.clock_out.is_none());

    let open = database.get_open_entry(employee.id).await?.unwrap();
    assert_eq!(open.id, entry.id);

    let closed = database.clock_out(entry.id).await?;
    assert!(closed.clock_out.is_some());
    assert!(database.get_open_entry(employee.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_clock_out_requires_open_entry() -> Result<()> {
    let database = common::create_test_database().await?;
    let employee = common::create_test_user(&database, Role::Employee).await?;

    // Nothing open yet
    assert!(database.clock_out(Uuid::new_v4()).await.is_err());

    // Closing twice fails the second time
    let entry = database.clock_in(employee.id).await?;
    database.clock_out(entry.id).await?;
    assert!(database.clock_out(entry.id).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_open_entries_are_per_employee() -> Result<()> {
    let database = common::create_test_database().await?;
    let first = common::create_test_user(&database, Role::Employee).await?;
    let second = common::create_test_user(&database, Role::Employee).await?;

    database.clock_in(first.id).await?;
    assert!(database.get_open_entry(first.id).await?.is_some());
    assert!(database.get_open_entry(second.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_entry_listing_respects_window() -> Result<()> {
    let database = common::create_test_database().await?;
    let employee = common::create_test_user(&database, Role::Employee).await?;

    let entry = database.clock_in(employee.id).await?;
    database.clock_out(entry.id).await?;

    let now = Utc::now();
    let covering = database
        .list_entries_for_employee(employee.id, now - Duration::hours(1), now + Duration::hours(1))
        .await?;
    assert_eq!(covering.len(), 1);

    // A window entirely in the past sees nothing
    let stale = database
        .list_entries_for_employee(
            employee.id,
            now - Duration::days(10),
            now - Duration::days(9),
        )
        .await?;
    assert!(stale.is_empty());
    Ok(())
}
