// ABOUTME: End-to-end HTTP tests against the real router on a live listener
// ABOUTME: Exercises login, the route policy table, and the public endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::models::Role;
use chrono::{Duration, Utc};
use serde_json::Value;

const TEST_PASSWORD: &str = "correct horse battery";

#[tokio::test]
async fn test_login_issues_usable_token() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;
    let admin = common::create_test_user(&resources.database, Role::Admin).await?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/auth/login"))
        .json(&serde_json::json!({"email": admin.email, "password": TEST_PASSWORD}))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    let token = body["jwt_token"].as_str().unwrap();
    assert_eq!(body["user"]["role"], "admin");

    // The token opens an admin route
    let response = client
        .get(format!("http://{addr}/admin/users"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    Ok(())
}

#[tokio::test]
async fn test_login_rejects_bad_password() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;
    let admin = common::create_test_user(&resources.database, Role::Admin).await?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/auth/login"))
        .json(&serde_json::json!({"email": admin.email, "password": "wrong"}))
        .send()
        .await?;
    assert_eq!(response.status(), 401);
    Ok(())
}

#[tokio::test]
async fn test_policy_table_gates_roles() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;

    let employee = common::create_test_user(&resources.database, Role::Employee).await?;
    let employee_token = resources.auth_manager.generate_token(&employee)?;

    let client = reqwest::Client::new();

    // No credentials at all: 401
    let response = client.get(format!("http://{addr}/admin/users")).send().await?;
    assert_eq!(response.status(), 401);

    // Employee on an admin route: 403
    let response = client
        .get(format!("http://{addr}/admin/users"))
        .bearer_auth(&employee_token)
        .send()
        .await?;
    assert_eq!(response.status(), 403);

    // Employee on an employee route: allowed
    let response = client
        .get(format!("http://{addr}/timeclock/entries"))
        .bearer_auth(&employee_token)
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    Ok(())
}

#[tokio::test]
async fn test_public_reservation_flow() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;
    let client = reqwest::Client::new();

    let reserved_for = (Utc::now() + Duration::days(1)).to_rfc3339();
    let response = client
        .post(format!("http://{addr}/reservations"))
        .json(&serde_json::json!({
            "name": "Ada Guest",
            "email": "ada@guests.example",
            "party_size": 4,
            "reserved_for": reserved_for,
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "pending");

    // Oversized parties are rejected with a validation error
    let response = client
        .post(format!("http://{addr}/reservations"))
        .json(&serde_json::json!({
            "name": "Ada Guest",
            "email": "ada@guests.example",
            "party_size": 500,
            "reserved_for": reserved_for,
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    Ok(())
}

#[tokio::test]
async fn test_public_menu_and_contact() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;
    let client = reqwest::Client::new();

    let response = client.get(format!("http://{addr}/menu")).send().await?;
    assert_eq!(response.status(), 200);
    let menu: Value = response.json().await?;
    assert!(menu.as_array().unwrap().is_empty());

    let response = client
        .post(format!("http://{addr}/contact"))
        .json(&serde_json::json!({
            "name": "Grace Visitor",
            "email": "grace@guests.example",
            "subject": "Private dining",
            "body": "Do you host groups of twelve?",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);
    Ok(())
}

#[tokio::test]
async fn test_order_lifecycle_over_http() -> Result<()> {
    let resources = common::create_test_resources().await?;
    let addr = common::spawn_test_server(&resources).await?;

    let admin = common::create_test_user(&resources.database, Role::Admin).await?;
    let employee = common::create_test_user(&resources.database, Role::Employee).await?;
    let admin_token = resources.auth_manager.generate_token(&admin)?;
    let employee_token = resources.auth_manager.generate_token(&employee)?;

    let client = reqwest::Client::new();

    // Admin seeds a menu item
    let response = client
        .post(format!("http://{addr}/admin/menu"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "name": "Steak frites",
            "category": "mains",
            "price_cents": 2400,
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);
    let item: Value = response.json().await?;
    let item_id = item["id"].as_str().unwrap();

    // Employee places an order
    let response = client
        .post(format!("http://{addr}/orders"))
        .bearer_auth(&employee_token)
        .json(&serde_json::json!({
            "table_number": 6,
            "items": [{"menu_item_id": item_id, "quantity": 2}],
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);
    let order: Value = response.json().await?;
    assert_eq!(order["total_cents"], 4800);
    let order_id = order["id"].as_str().unwrap();

    // And marks it ready
    let response = client
        .put(format!("http://{addr}/orders/{order_id}/status"))
        .bearer_auth(&employee_token)
        .json(&serde_json::json!({"status": "ready"}))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await?;
    assert_eq!(updated["status"], "ready");
    Ok(())
}
