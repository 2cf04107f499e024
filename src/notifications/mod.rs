// ABOUTME: Outbound guest notification module
// ABOUTME: Currently templated email over an HTTP mail gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Outbound notifications to guests

/// Templated email over an HTTP mail gateway
pub mod email;

pub use email::EmailService;
