// ABOUTME: Environment configuration tests
// ABOUTME: Serialized because they mutate process-wide environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

use brasserie_server::config::environment::ServerConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_from_env_reads_overrides() {
    std::env::set_var("HTTP_PORT", "9155");
    std::env::set_var("WS_HEARTBEAT_SECS", "5");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9155);
    assert_eq!(config.websocket.heartbeat_secs, 5);
    assert!(config.database.url.is_memory());
    assert!(!config.email.is_enabled());

    std::env::remove_var("HTTP_PORT");
    std::env::remove_var("WS_HEARTBEAT_SECS");
    std::env::remove_var("DATABASE_URL");
}

#[test]
#[serial]
fn test_invalid_numeric_falls_back_to_default() {
    std::env::set_var("HTTP_PORT", "not-a-port");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);

    std::env::remove_var("HTTP_PORT");
}

#[test]
#[serial]
fn test_email_enabled_when_gateway_configured() {
    std::env::set_var("MAIL_API_URL", "https://mail.example/send");
    std::env::set_var("MAIL_FROM", "bookings@brasserie.example");

    let config = ServerConfig::from_env().unwrap();
    assert!(config.email.is_enabled());
    assert_eq!(config.email.from_address, "bookings@brasserie.example");

    std::env::remove_var("MAIL_API_URL");
    std::env::remove_var("MAIL_FROM");
}
