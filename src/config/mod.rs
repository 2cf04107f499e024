// ABOUTME: Configuration module grouping environment-derived server settings
// ABOUTME: All configuration is environment-only; no config files are read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Configuration management

/// Environment-based server configuration
pub mod environment;
