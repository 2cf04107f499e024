// ABOUTME: WebSocket notification hub for real-time staff updates
// ABOUTME: Connection registry, authenticate-first handshake, heartbeat sweep, role-filtered fan-out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! WebSocket notification hub
//!
//! Pushes business events (orders, reservations, clock events, table-ready
//! signals) to connected staff clients. The hub is a thin fan-out, not a
//! message broker: delivery is fire-and-forget, at-most-once, with no
//! persistence and no catch-up for clients that are offline at send time.
//!
//! Protocol (one JSON object per text frame):
//! - client: `{"type": "authenticate", "data": {"token": "<jwt>"}}`
//! - server: `{"type": "authenticated", "userId": "...", "role": "..."}`
//!   or `{"type": "auth_error", "message": "..."}` followed by a close
//! - server events: `{"type": "<kind>", "data": ..., "timestamp": "<RFC3339>"}`
//!
//! Liveness uses transport-level ping/pong frames, opaque to the JSON
//! protocol.

use crate::auth::AuthManager;
use crate::models::{EventKind, Role};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use uuid::Uuid;

// WebSocket message type alias for Axum
type Message = axum::extract::ws::Message;

/// A registered, authenticated client socket
struct ClientConnection {
    /// Distinguishes this socket from a later one for the same identity
    conn_id: Uuid,
    role: Role,
    tx: mpsc::UnboundedSender<Message>,
    /// Cleared before each probe, set again by the pong (or any activity)
    alive: Arc<AtomicBool>,
}

/// Handle returned on registration; shared with the connection's read loop
pub struct ClientHandle {
    /// Registry entry identifier for this particular socket
    pub conn_id: Uuid,
    alive: Arc<AtomicBool>,
}

impl ClientHandle {
    /// Record liveness, as the read loop does when a pong arrives
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::Release);
    }
}

/// Manages staff WebSocket connections and event fan-out
#[derive(Clone)]
pub struct NotificationHub {
    auth_manager: Arc<AuthManager>,
    heartbeat_interval: Duration,
    clients: Arc<RwLock<HashMap<Uuid, ClientConnection>>>,
}

impl NotificationHub {
    /// Create a new hub; no background work starts until
    /// [`Self::start_heartbeat`] is called.
    #[must_use]
    pub fn new(auth_manager: Arc<AuthManager>, heartbeat_interval: Duration) -> Self {
        Self {
            auth_manager,
            heartbeat_interval,
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of authenticated connections currently registered
    pub async fn connected_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Whether an identity currently has a live registered connection
    pub async fn is_connected(&self, identity: Uuid) -> bool {
        self.clients.read().await.contains_key(&identity)
    }

    /// Bind an authenticated client to the registry.
    ///
    /// A prior connection for the same identity is evicted: the dispatcher
    /// will never address the stale socket again, though the socket itself
    /// is left to drain on its own.
    pub async fn register_client(
        &self,
        identity: Uuid,
        role: Role,
        tx: mpsc::UnboundedSender<Message>,
    ) -> ClientHandle {
        let conn_id = Uuid::new_v4();
        let alive = Arc::new(AtomicBool::new(true));
        let connection = ClientConnection {
            conn_id,
            role,
            tx,
            alive: alive.clone(),
        };

        let evicted = self.clients.write().await.insert(identity, connection);
        if evicted.is_some() {
            info!(identity = %identity, "replacing prior connection for identity");
        }
        debug!(identity = %identity, role = %role, "client registered");

        ClientHandle { conn_id, alive }
    }

    /// Remove a registry entry, but only if it still belongs to this socket
    async fn unregister_client(&self, identity: Uuid, conn_id: Uuid) {
        let mut clients = self.clients.write().await;
        if clients
            .get(&identity)
            .is_some_and(|c| c.conn_id == conn_id)
        {
            clients.remove(&identity);
            debug!(identity = %identity, "client unregistered");
        }
    }

    /// Send an event to every registered connection whose role is allowed.
    ///
    /// Per-recipient failures are isolated: a dead socket is logged and
    /// skipped, the fan-out continues. No ordering across recipients, no
    /// delivery confirmation, no persistence.
    pub async fn broadcast(&self, kind: EventKind, payload: Value, allowed_roles: &[Role]) {
        let frame = event_frame(kind, &payload);
        let clients = self.clients.read().await;
        for (identity, client) in clients.iter() {
            if !allowed_roles.contains(&client.role) {
                continue;
            }
            if let Err(e) = client.tx.send(Message::Text(frame.clone())) {
                warn!(
                    identity = %identity,
                    kind = kind.as_str(),
                    error = ?e,
                    "failed to deliver broadcast to client"
                );
            }
        }
    }

    /// Send an event to exactly one identity, if currently connected.
    ///
    /// Silent no-op when the identity has no live connection.
    pub async fn notify(&self, identity: Uuid, kind: EventKind, payload: Value) {
        let clients = self.clients.read().await;
        let Some(client) = clients.get(&identity) else {
            debug!(identity = %identity, kind = kind.as_str(), "notify target not connected");
            return;
        };
        if let Err(e) = client.tx.send(Message::Text(event_frame(kind, &payload))) {
            warn!(
                identity = %identity,
                kind = kind.as_str(),
                error = ?e,
                "failed to deliver targeted notification"
            );
        }
    }

    /// One heartbeat cycle over all registered connections.
    ///
    /// Connections that did not answer the previous probe are closed and
    /// removed (an informational disconnect, not an error); the rest are
    /// marked awaiting-pong and probed again.
    pub async fn heartbeat_sweep(&self) {
        let mut clients = self.clients.write().await;
        clients.retain(|identity, client| {
            if !client.alive.load(Ordering::Acquire) {
                info!(identity = %identity, "heartbeat timeout, closing connection");
                let _ = client.tx.send(Message::Close(None));
                return false;
            }
            client.alive.store(false, Ordering::Release);
            if client.tx.send(Message::Ping(Vec::new())).is_err() {
                info!(identity = %identity, "connection gone, dropping registry entry");
                return false;
            }
            true
        });
    }

    /// Start the background heartbeat task
    pub fn start_heartbeat(&self) {
        let hub = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(hub.heartbeat_interval);
            // The first tick fires immediately; skip it so fresh
            // connections get a full interval before their first probe.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                hub.heartbeat_sweep().await;
            }
        });
    }

    /// Handle one upgraded WebSocket connection until it closes
    pub async fn handle_connection(&self, ws: axum::extract::ws::WebSocket) {
        let (mut ws_tx, mut ws_rx) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

        // Forward queued frames to the socket; a Close frame ends the task
        // so heartbeat termination actually tears the transport down.
        let send_task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let is_close = matches!(message, Message::Close(_));
                if ws_tx.send(message).await.is_err() || is_close {
                    break;
                }
            }
        });

        let mut session: Option<Session> = None;

        while let Some(msg) = ws_rx.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    match self.handle_text_frame(&text, &tx, &mut session).await {
                        FrameOutcome::Continue => {}
                        FrameOutcome::Close => break,
                    }
                }
                Ok(Message::Pong(_)) => {
                    if let Some(session) = &session {
                        session.alive.store(true, Ordering::Release);
                    }
                }
                Ok(Message::Close(_)) | Err(_) => break,
                // Transport answers pings on its own; binary frames have
                // no meaning in this protocol.
                Ok(_) => {}
            }
        }

        if let Some(session) = session {
            self.unregister_client(session.user_id, session.conn_id).await;
        }
        // Dropping the last sender lets the forward task drain queued
        // frames (auth errors, the close) before the transport goes away.
        drop(tx);
        let _ = send_task.await;
    }

    /// Process one inbound text frame
    async fn handle_text_frame(
        &self,
        text: &str,
        tx: &mpsc::UnboundedSender<Message>,
        session: &mut Option<Session>,
    ) -> FrameOutcome {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "malformed client frame");
                send_json(
                    tx,
                    &serde_json::json!({
                        "type": EventKind::Error.as_str(),
                        "message": "invalid JSON frame",
                    }),
                );
                return FrameOutcome::Continue;
            }
        };

        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            debug!("client frame missing type field");
            send_json(
                tx,
                &serde_json::json!({
                    "type": EventKind::Error.as_str(),
                    "message": "frame missing type field",
                }),
            );
            return FrameOutcome::Continue;
        };

        if kind != "authenticate" {
            // No contract for non-handshake client traffic; log and ignore.
            debug!(kind, authenticated = session.is_some(), "ignoring client frame");
            return FrameOutcome::Continue;
        }

        let Some(token) = value
            .get("data")
            .and_then(|d| d.get("token"))
            .and_then(Value::as_str)
        else {
            send_json(
                tx,
                &serde_json::json!({
                    "type": EventKind::Error.as_str(),
                    "message": "authenticate frame missing data.token",
                }),
            );
            return FrameOutcome::Continue;
        };

        match self.auth_manager.verify(token) {
            Ok(auth) => {
                let handle = self
                    .register_client(auth.user_id, auth.role, tx.clone())
                    .await;
                *session = Some(Session {
                    user_id: auth.user_id,
                    conn_id: handle.conn_id,
                    alive: handle.alive,
                });
                send_json(
                    tx,
                    &serde_json::json!({
                        "type": "authenticated",
                        "userId": auth.user_id,
                        "role": auth.role.as_str(),
                    }),
                );
                info!(identity = %auth.user_id, role = %auth.role, "websocket authenticated");
                FrameOutcome::Continue
            }
            Err(e) => {
                warn!(error = %e, "websocket authentication failed");
                send_json(
                    tx,
                    &serde_json::json!({
                        "type": "auth_error",
                        "message": e.to_string(),
                    }),
                );
                let _ = tx.send(Message::Close(None));
                FrameOutcome::Close
            }
        }
    }
}

/// Read-loop state for an authenticated connection
struct Session {
    user_id: Uuid,
    conn_id: Uuid,
    alive: Arc<AtomicBool>,
}

/// Whether the read loop should keep going after a frame
enum FrameOutcome {
    Continue,
    Close,
}

/// Serialize the standard event envelope
fn event_frame(kind: EventKind, payload: &Value) -> String {
    serde_json::json!({
        "type": kind.as_str(),
        "data": payload,
        "timestamp": Utc::now().to_rfc3339(),
    })
    .to_string()
}

/// Queue a JSON frame, logging delivery failure
fn send_json(tx: &mpsc::UnboundedSender<Message>, value: &Value) {
    if let Err(e) = tx.send(Message::Text(value.to_string())) {
        warn!(error = ?e, "failed to queue frame for client");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_frame_envelope() {
        let frame = event_frame(EventKind::OrderCreated, &serde_json::json!({"id": 7}));
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "order_created");
        assert_eq!(value["data"]["id"], 7);
        assert!(value["timestamp"].is_string());
    }
}
