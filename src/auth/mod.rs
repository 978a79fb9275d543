// ABOUTME: Garmin SSO authentication - credential login, ticket exchange, and session resume
// ABOUTME: Re-exports the authenticator state machine, session record, and page scrapers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Login state machine over the SSO and application hosts
pub mod authenticator;
/// Regex extraction of CSRF tokens, tickets, and embedded JSON
pub mod scrape;
/// Persistable session snapshot
pub mod session;

pub use authenticator::{Authenticator, LoginOutcome, LoginState};
pub use scrape::{
    extract_csrf_token, extract_json_block, extract_service_ticket, JsonBlock, ViewerProfile,
};
pub use session::Session;
