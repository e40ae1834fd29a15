// ABOUTME: Configuration module for the liftlog server
// ABOUTME: Re-exports environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Server configuration loaded from environment variables

pub mod environment;

pub use environment::ServerConfig;
