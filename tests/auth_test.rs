// ABOUTME: Authentication tests: token round-trips, expiry, tampering, middleware gating
// ABOUTME: Exercises AuthManager and AuthMiddleware against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

mod common;

use anyhow::Result;
use brasserie_server::auth::{generate_jwt_secret, AuthManager, JwtValidationError};
use brasserie_server::middleware::AuthMiddleware;
use brasserie_server::models::Role;
use chrono::Utc;
use std::sync::Arc;

#[tokio::test]
async fn test_token_round_trip_carries_identity_and_role() -> Result<()> {
    let database = common::create_test_database().await?;
    let auth_manager = common::create_test_auth_manager();
    let user = common::create_test_user(&database, Role::Admin).await?;

    let token = auth_manager.generate_token(&user)?;
    let auth = auth_manager.verify(&token).map_err(|e| anyhow::anyhow!("{e}"))?;

    assert_eq!(auth.user_id, user.id);
    assert_eq!(auth.role, Role::Admin);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_rejected_as_expired() -> Result<()> {
    let database = common::create_test_database().await?;
    let auth_manager = common::create_test_auth_manager();
    let user = common::create_test_user(&database, Role::Employee).await?;

    let exp = (Utc::now() - chrono::Duration::hours(2)).timestamp();
    let token = auth_manager.generate_token_with_expiry(&user, exp)?;

    match auth_manager.validate_token_detailed(&token) {
        Err(JwtValidationError::TokenExpired { .. }) => {}
        other => panic!("expected TokenExpired, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_token_from_other_secret_is_invalid() -> Result<()> {
    let database = common::create_test_database().await?;
    let user = common::create_test_user(&database, Role::Employee).await?;

    let issuer = AuthManager::new(generate_jwt_secret().to_vec(), 24);
    let verifier = AuthManager::new(generate_jwt_secret().to_vec(), 24);

    let token = issuer.generate_token(&user)?;
    assert!(verifier.validate_token_detailed(&token).is_err());
    Ok(())
}

#[tokio::test]
async fn test_garbage_token_is_malformed() {
    let auth_manager = common::create_test_auth_manager();
    match auth_manager.validate_token_detailed("not.a.token") {
        Err(JwtValidationError::TokenMalformed { .. } | JwtValidationError::TokenInvalid { .. }) => {}
        other => panic!("expected malformed/invalid, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sequential_tokens_differ() -> Result<()> {
    let database = common::create_test_database().await?;
    let auth_manager = common::create_test_auth_manager();
    let user = common::create_test_user(&database, Role::Admin).await?;

    let first = auth_manager.generate_token(&user)?;
    let second = auth_manager.generate_token(&user)?;
    assert_ne!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_middleware_rejects_deactivated_account() -> Result<()> {
    let database = common::create_test_database().await?;
    let auth_manager = common::create_test_auth_manager();
    let user = common::create_test_user(&database, Role::Employee).await?;
    let token = auth_manager.generate_token(&user)?;

    let middleware = AuthMiddleware::new(Arc::clone(&auth_manager), database.clone());

    let mut headers = axum::http::HeaderMap::new();
    headers.insert("authorization", format!("Bearer {token}").parse()?);

    // Active account passes
    let auth = middleware.authenticate_request(&headers).await;
    assert!(auth.is_ok());

    // Deactivation outlives the still-valid token
    database.set_user_active(user.id, false).await?;
    let auth = middleware.authenticate_request(&headers).await;
    assert!(auth.is_err());
    Ok(())
}

#[tokio::test]
async fn test_middleware_requires_bearer_scheme() -> Result<()> {
    let database = common::create_test_database().await?;
    let auth_manager = common::create_test_auth_manager();
    let middleware = AuthMiddleware::new(auth_manager, database);

    let empty = axum::http::HeaderMap::new();
    assert!(middleware.authenticate_request(&empty).await.is_err());

    let mut basic = axum::http::HeaderMap::new();
    basic.insert("authorization", "Basic dXNlcjpwYXNz".parse()?);
    assert!(middleware.authenticate_request(&basic).await.is_err());
    Ok(())
}
