// ABOUTME: Application constants and tunables shared across modules
// ABOUTME: Centralizes timing defaults, limits, and error message strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Application-wide constants

/// Timing defaults
pub mod time {
    /// Interval between heartbeat sweeps over open WebSocket connections
    pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

    /// Seconds per hour, for duration formatting
    pub const SECONDS_PER_HOUR: u32 = 3600;
}

/// Limits and sizing
pub mod limits {
    /// Default JWT session lifetime in hours
    pub const DEFAULT_SESSION_HOURS: i64 = 24;

    /// Maximum accepted HTTP request body in bytes
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

    /// Largest party size a reservation will accept
    pub const MAX_PARTY_SIZE: i64 = 20;

    /// Minimum password length for staff accounts
    pub const MIN_PASSWORD_LENGTH: usize = 8;
}

/// Reusable error message strings
pub mod error_messages {
    /// Login failed (deliberately does not reveal which part was wrong)
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

    /// Registration rejected: email already taken
    pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";

    /// Registration rejected: malformed email
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";

    /// Registration rejected: password too short
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 8 characters";

    /// Account exists but has been deactivated
    pub const ACCOUNT_DEACTIVATED: &str = "This account has been deactivated";
}

/// Service identity used in logs
pub mod service_names {
    /// Canonical service name for structured logging
    pub const BRASSERIE_SERVER: &str = "brasserie-server";
}
