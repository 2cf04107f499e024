// ABOUTME: Database tests for reservations and the contact inbox
// ABOUTME: Covers creation, status transitions, filtered listing, and read flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::models::{ContactMessage, Reservation, ReservationStatus};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn sample_reservation(party_size: i64, hours_ahead: i64) -> Reservation {
    Reservation {
        id: Uuid::new_v4(),
        name: "Ada Guest".into(),
        email: "ada@guests.example".into(),
        phone: Some("555-0101".into()),
        party_size,
        reserved_for: Utc::now() + Duration::hours(hours_ahead),
        note: None,
        status: ReservationStatus::Pending,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_reservation_create_and_get() -> Result<()> {
    let database = common::create_test_database().await?;
    let reservation = sample_reservation(4, 24);

    database.create_reservation(&reservation).await?;
    let fetched = database.get_reservation(reservation.id).await?.unwrap();

    assert_eq!(fetched.name, "Ada Guest");
    assert_eq!(fetched.party_size, 4);
    assert_eq!(fetched.status, ReservationStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn test_reservation_status_transition() -> Result<()> {
    let database = common::create_test_database().await?;
    let reservation = sample_reservation(2, 24);
    database.create_reservation(&reservation).await?;

    let updated = database
        .update_reservation_status(reservation.id, ReservationStatus::Confirmed)
        .await?;
    assert_eq!(updated.status, ReservationStatus::Confirmed);

    // Unknown ids error rather than silently succeeding
    assert!(database
        .update_reservation_status(Uuid::new_v4(), ReservationStatus::Declined)
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn test_reservation_listing_filters() -> Result<()> {
    let database = common::create_test_database().await?;

    let pending = sample_reservation(2, 12);
    let confirmed = sample_reservation(6, 48);
    database.create_reservation(&pending).await?;
    database.create_reservation(&confirmed).await?;
    database
        .update_reservation_status(confirmed.id, ReservationStatus::Confirmed)
        .await?;

    let only_pending = database
        .list_reservations(Some(ReservationStatus::Pending), None, None)
        .await?;
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].id, pending.id);

    // Window covering only the nearer reservation
    let soon = database
        .list_reservations(None, Some(Utc::now()), Some(Utc::now() + Duration::hours(24)))
        .await?;
    assert_eq!(soon.len(), 1);
    assert_eq!(soon[0].id, pending.id);

    let all = database.list_reservations(None, None, None).await?;
    assert_eq!(all.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_contact_inbox_read_flags() -> Result<()> {
    let database = common::create_test_database().await?;

    let message = ContactMessage {
        id: Uuid::new_v4(),
        name: "Grace Visitor".into(),
        email: "grace@guests.example".into(),
        subject: "Private dining".into(),
        body: "Do you host groups of twelve?".into(),
        is_read: false,
        created_at: Utc::now(),
    };
    database.create_contact_message(&message).await?;

    let unread = database.list_contact_messages(true).await?;
    assert_eq!(unread.len(), 1);

    database.mark_contact_read(message.id).await?;
    let unread = database.list_contact_messages(true).await?;
    assert!(unread.is_empty());

    let all = database.list_contact_messages(false).await?;
    assert_eq!(all.len(), 1);
    assert!(all[0].is_read);
    Ok(())
}
