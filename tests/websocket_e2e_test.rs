// ABOUTME: End-to-end WebSocket tests against the real router on a live listener
// ABOUTME: Exercises the authenticate handshake, bad-token close, and post-auth delivery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::models::{EventKind, Role};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message as WsMessage;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Read frames until the next text frame, skipping transport pings
async fn next_text(ws: &mut WsStream) -> Option<Value> {
    while let Some(frame) = ws.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => return serde_json::from_str(&text).ok(),
            Ok(WsMessage::Close(_)) | Err(_) => return None,
            Ok(_) => {}
        }
    }
    None
}

#[tokio::test]
async fn test_handshake_then_broadcast_delivery() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;

    let admin = common::create_test_user(&resources.database, Role::Admin).await?;
    let token = resources.auth_manager.generate_token(&admin)?;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await?;

    ws.send(WsMessage::Text(
        serde_json::json!({"type": "authenticate", "data": {"token": token}}).to_string(),
    ))
    .await?;

    let frame = next_text(&mut ws).await.unwrap();
    assert_eq!(frame["type"], "authenticated");
    assert_eq!(frame["userId"], admin.id.to_string());
    assert_eq!(frame["role"], "admin");
    assert!(resources.hub.is_connected(admin.id).await);

    resources
        .hub
        .broadcast(
            EventKind::OrderCreated,
            serde_json::json!({"id": 7}),
            &[Role::Admin, Role::Employee],
        )
        .await;

    let frame = next_text(&mut ws).await.unwrap();
    assert_eq!(frame["type"], "order_created");
    assert_eq!(frame["data"]["id"], 7);
    assert!(frame["timestamp"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_invalid_token_gets_auth_error_and_close() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await?;

    ws.send(WsMessage::Text(
        serde_json::json!({"type": "authenticate", "data": {"token": "not-a-real-token"}})
            .to_string(),
    ))
    .await?;

    let frame = next_text(&mut ws).await.unwrap();
    assert_eq!(frame["type"], "auth_error");
    assert!(frame["message"].as_str().is_some());

    // Server closes the socket after the auth error
    assert!(next_text(&mut ws).await.is_none());
    assert_eq!(resources.hub.connected_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;

    let employee = common::create_test_user(&resources.database, Role::Employee).await?;
    let token = resources.auth_manager.generate_token(&employee)?;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await?;

    // Not JSON at all: the server answers with an error frame and stays open
    ws.send(WsMessage::Text("definitely not json".into())).await?;
    let frame = next_text(&mut ws).await.unwrap();
    assert_eq!(frame["type"], "error");

    // The same socket can still complete the handshake afterwards
    ws.send(WsMessage::Text(
        serde_json::json!({"type": "authenticate", "data": {"token": token}}).to_string(),
    ))
    .await?;
    let frame = next_text(&mut ws).await.unwrap();
    assert_eq!(frame["type"], "authenticated");
    assert_eq!(frame["role"], "employee");

    Ok(())
}

#[tokio::test]
async fn test_pre_auth_frames_are_ignored() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;

    let admin = common::create_test_user(&resources.database, Role::Admin).await?;
    let token = resources.auth_manager.generate_token(&admin)?;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await?;

    // Valid JSON of a non-handshake kind before auth: logged and ignored
    ws.send(WsMessage::Text(
        serde_json::json!({"type": "subscribe", "data": {"topics": ["orders"]}}).to_string(),
    ))
    .await?;

    // The next answered frame is the handshake response, nothing else
    ws.send(WsMessage::Text(
        serde_json::json!({"type": "authenticate", "data": {"token": token}}).to_string(),
    ))
    .await?;
    let frame = next_text(&mut ws).await.unwrap();
    assert_eq!(frame["type"], "authenticated");

    Ok(())
}
