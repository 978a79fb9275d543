// ABOUTME: Library entry point for the Garmin Connect client
// ABOUTME: SSO login with cookie session resume plus typed wellness and activity accessors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Garmin Connect
//!
//! An async client for the Garmin Connect web service. Connect has no public
//! token API for personal accounts, so the client logs in the way the web
//! widget does and keeps the resulting session cookies.
//!
//! ## Features
//!
//! - **SSO login**: CSRF scrape, credential post, service ticket exchange
//! - **Session resume**: export the cookie snapshot, restore it later, fall
//!   back to a credential login when it has expired
//! - **Typed accessors**: daily summaries, sleep, stress, body composition,
//!   activities, downloads, devices, badges, and challenges
//! - **Uniform errors**: every non-2xx status maps to one [`GarminError`]
//!
//! ## Architecture
//!
//! - **`http`**: shared reqwest transport, partitioned cookie jar, endpoint clients
//! - **`auth`**: login state machine, page scraping, session record
//! - **`api`**: accessor methods on [`GarminConnect`], grouped by domain
//! - **`config`**: region, host URLs, timeouts
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_garmin_connect::{GarminConnect, GarminResult, Region};
//!
//! #[tokio::main]
//! async fn main() -> GarminResult<()> {
//!     let mut client = GarminConnect::new("runner@example.com", "secret", Region::Global)?;
//!     client.login().await?;
//!
//!     for device in client.get_devices().await? {
//!         println!("{}", device["productDisplayName"]);
//!     }
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────

/// Typed data accessors on [`GarminConnect`]
pub mod api;

/// SSO authentication and session management
pub mod auth;

/// Client facade
pub mod client;

/// Region, credentials, and host configuration
pub mod config;

/// Hosts, endpoint paths, and protocol constants
pub mod constants;

/// Error types with status-to-error mapping
pub mod errors;

/// Transport, cookie jar, and endpoint clients
pub mod http;

/// Tracing subscriber setup for binaries
pub mod logging;

/// Request-side models
pub mod models;

pub use auth::{LoginOutcome, LoginState, Session};
pub use client::GarminConnect;
pub use config::{ConnectConfig, Credentials, Region};
pub use errors::{AuthFailure, ConnectionFailure, GarminError, GarminResult};
pub use models::ActivityDownloadFormat;
