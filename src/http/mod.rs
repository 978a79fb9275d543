// ABOUTME: HTTP plumbing - browser-like transport, shared cookie jar, and endpoint clients
// ABOUTME: Everything below the authentication state machine lives here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cookie jar partitioned by authentication domain
pub mod cookies;
/// Endpoint client with uniform status-to-error mapping
pub mod endpoint;
/// Shared reqwest client
pub mod transport;

pub use cookies::{CookieDomain, CookieJar, CookieMap};
pub use endpoint::{EndpointClient, EndpointConfig, EndpointResponse};
pub use transport::Transport;
