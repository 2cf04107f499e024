// ABOUTME: Hub-level tests for the notification registry, fan-out, and heartbeat
// ABOUTME: Exercises role filtering, identity eviction, targeted notify, and timeout sweeps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use axum::extract::ws::Message;
use brasserie_server::models::{EventKind, Role};
use brasserie_server::websocket::NotificationHub;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Duration;
use uuid::Uuid;

fn test_hub() -> NotificationHub {
    common::init_test_logging();
    NotificationHub::new(common::create_test_auth_manager(), Duration::from_secs(30))
}

fn text_frame(message: Message) -> Value {
    match message {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_broadcast_filters_by_role() {
    let hub = test_hub();
    let (admin_tx, mut admin_rx) = mpsc::unbounded_channel();
    let (employee_tx, mut employee_rx) = mpsc::unbounded_channel();

    hub.register_client(Uuid::new_v4(), Role::Admin, admin_tx).await;
    hub.register_client(Uuid::new_v4(), Role::Employee, employee_tx).await;

    hub.broadcast(
        EventKind::ReservationCreated,
        serde_json::json!({"id": 1}),
        &[Role::Admin],
    )
    .await;

    // Admin gets exactly one frame with matching kind and payload
    let frame = text_frame(admin_rx.recv().await.unwrap());
    assert_eq!(frame["type"], "reservation_created");
    assert_eq!(frame["data"]["id"], 1);
    assert!(frame["timestamp"].is_string());
    assert!(admin_rx.try_recv().is_err());

    // Employee role is outside the allow-list and receives nothing
    assert!(employee_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_broadcast_reaches_every_allowed_role() {
    let hub = test_hub();
    let (admin_tx, mut admin_rx) = mpsc::unbounded_channel();
    let (employee_tx, mut employee_rx) = mpsc::unbounded_channel();

    hub.register_client(Uuid::new_v4(), Role::Admin, admin_tx).await;
    hub.register_client(Uuid::new_v4(), Role::Employee, employee_tx).await;

    hub.broadcast(
        EventKind::OrderCreated,
        serde_json::json!({"id": 7}),
        &[Role::Admin, Role::Employee],
    )
    .await;

    for rx in [&mut admin_rx, &mut employee_rx] {
        let frame = text_frame(rx.recv().await.unwrap());
        assert_eq!(frame["type"], "order_created");
        assert_eq!(frame["data"]["id"], 7);
        assert!(rx.try_recv().is_err());
    }
}

#[tokio::test]
async fn test_broadcast_isolates_dead_recipients() {
    let hub = test_hub();
    let (dead_tx, dead_rx) = mpsc::unbounded_channel();
    let (live_tx, mut live_rx) = mpsc::unbounded_channel();

    hub.register_client(Uuid::new_v4(), Role::Admin, dead_tx).await;
    hub.register_client(Uuid::new_v4(), Role::Admin, live_tx).await;

    // Closed receiver simulates a socket in closing state
    drop(dead_rx);

    hub.broadcast(EventKind::OrderUpdated, serde_json::json!({"id": 2}), &[Role::Admin])
        .await;

    // The dead recipient must not block delivery to the live one
    let frame = text_frame(live_rx.recv().await.unwrap());
    assert_eq!(frame["type"], "order_updated");
}

#[tokio::test]
async fn test_second_handshake_evicts_first_connection() {
    let hub = test_hub();
    let identity = Uuid::new_v4();
    let (first_tx, mut first_rx) = mpsc::unbounded_channel();
    let (second_tx, mut second_rx) = mpsc::unbounded_channel();

    hub.register_client(identity, Role::Employee, first_tx).await;
    hub.register_client(identity, Role::Employee, second_tx).await;

    assert_eq!(hub.connected_count().await, 1);

    hub.broadcast(EventKind::TableReady, serde_json::json!({"table_number": 4}), &[Role::Employee])
        .await;

    // Only the most recent connection for the identity is addressed
    let frame = text_frame(second_rx.recv().await.unwrap());
    assert_eq!(frame["type"], "table_ready");
    assert!(first_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_stale_disconnect_does_not_evict_replacement() {
    let hub = test_hub();
    let identity = Uuid::new_v4();
    let (first_tx, _first_rx) = mpsc::unbounded_channel();
    let (second_tx, _second_rx) = mpsc::unbounded_channel();

    hub.register_client(identity, Role::Employee, first_tx).await;
    hub.register_client(identity, Role::Employee, second_tx).await;

    // The replacement stays registered even though the first socket died
    assert!(hub.is_connected(identity).await);
    assert_eq!(hub.connected_count().await, 1);
}

#[tokio::test]
async fn test_notify_unknown_identity_is_silent_noop() {
    let hub = test_hub();
    // Must neither panic nor error
    hub.notify(Uuid::new_v4(), EventKind::TableReady, serde_json::json!({"table_number": 9}))
        .await;
    assert_eq!(hub.connected_count().await, 0);
}

#[tokio::test]
async fn test_notify_delivers_to_single_identity() {
    let hub = test_hub();
    let target = Uuid::new_v4();
    let (target_tx, mut target_rx) = mpsc::unbounded_channel();
    let (other_tx, mut other_rx) = mpsc::unbounded_channel();

    hub.register_client(target, Role::Employee, target_tx).await;
    hub.register_client(Uuid::new_v4(), Role::Employee, other_tx).await;

    hub.notify(target, EventKind::TableReady, serde_json::json!({"table_number": 3}))
        .await;

    let frame = text_frame(target_rx.recv().await.unwrap());
    assert_eq!(frame["type"], "table_ready");
    assert_eq!(frame["data"]["table_number"], 3);
    assert!(other_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_silent_connection_removed_after_two_sweeps() {
    let hub = test_hub();
    let identity = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel();
    hub.register_client(identity, Role::Admin, tx).await;

    // First sweep: marked awaiting-pong and probed
    hub.heartbeat_sweep().await;
    assert!(hub.is_connected(identity).await);
    assert!(matches!(rx.recv().await, Some(Message::Ping(_))));

    // No pong arrives; second sweep terminates the connection
    hub.heartbeat_sweep().await;
    assert!(!hub.is_connected(identity).await);
    assert!(matches!(rx.recv().await, Some(Message::Close(_))));
}

#[tokio::test]
async fn test_responsive_connection_survives_sweeps() {
    let hub = test_hub();
    let identity = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = hub.register_client(identity, Role::Admin, tx).await;

    for _ in 0..3 {
        hub.heartbeat_sweep().await;
        assert!(matches!(rx.recv().await, Some(Message::Ping(_))));
        // The read loop does this when the pong frame arrives
        handle.mark_alive();
    }

    assert!(hub.is_connected(identity).await);
}
