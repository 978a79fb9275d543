// ABOUTME: Shared fixtures for integration tests - quiet logging, SSO pages, and mock login wiring
// ABOUTME: Points a client at a wiremock server laid out like the Garmin SSO and Connect hosts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    missing_docs,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_garmin_connect`

use pierre_garmin_connect::{ConnectConfig, Credentials, GarminConnect, LoginOutcome, Session};
use std::sync::Once;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT_LOGGER: Once = Once::new();

pub const USERNAME: &str = "runner@example.com";
pub const PASSWORD: &str = "hunter2";
pub const DISPLAY_NAME: &str = "runner42";
pub const FULL_NAME: &str = "Ada Runner";
pub const CSRF_TOKEN: &str = "c5rfT0ken";
pub const TICKET: &str = "ST-0421-aBcDeF-cas";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Sign-in widget with a hidden CSRF input
pub fn signin_page() -> String {
    format!(
        r#"<html><body><form method="post">
<input type="hidden" name="_csrf" value="{CSRF_TOKEN}" />
<input name="username" /><input name="password" type="password" />
</form></body></html>"#
    )
}

/// Credential POST response carrying the service ticket link
pub fn ticket_page() -> String {
    format!(
        r#"<html><script>var response_url = "http:\/\/localhost\/modern?ticket={TICKET}";</script></html>"#
    )
}

/// Connect application page with both embedded profile blocks
pub fn app_page(display_name: &str) -> String {
    format!(
        "<html><head><script>\n\
         window.VIEWER_USERPREFERENCES = {{\\\"displayName\\\":\\\"{display_name}\\\",\\\"measurementSystem\\\":\\\"metric\\\"}};\n\
         window.VIEWER_SOCIAL_PROFILE = {{\"displayName\":\"{display_name}\",\"fullName\":\"{FULL_NAME}\"}};\n\
         </script></head><body></body></html>"
    )
}

pub fn credentials() -> Credentials {
    Credentials::new(USERNAME, PASSWORD)
}

/// Every host of the client pointed at the mock server
pub fn test_config(server: &MockServer) -> ConnectConfig {
    ConnectConfig::default().with_base_url(&server.uri())
}

/// Mount the three steps of a successful credential login
///
/// Each step expects exactly `times` hits, verified when the server drops.
pub async fn mount_credential_login(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/sso/signin"))
        .and(query_param("clientId", "GarminConnect"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "GARMIN-SSO=1; Path=/sso")
                .set_body_string(signin_page()),
        )
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .and(body_string_contains(format!("_csrf={CSRF_TOKEN}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "CASTGC=TGT-1-cas; Path=/sso; Secure")
                .set_body_string(ticket_page()),
        )
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/modern/"))
        .and(query_param("ticket", TICKET))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "SESSIONID=app-session-1; Path=/; HttpOnly")
                .set_body_string(app_page(DISPLAY_NAME)),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Client that has completed a credential login against the mock
pub async fn logged_in_client(server: &MockServer) -> GarminConnect {
    init_test_logging();
    mount_credential_login(server, 1).await;

    let mut client = GarminConnect::with_config(credentials(), test_config(server), None).unwrap();
    let outcome = client.login().await.unwrap();
    assert_eq!(outcome, LoginOutcome::Authenticated);
    client
}

/// Saved session for `display_name` holding one cookie per domain
pub fn saved_session(display_name: &str) -> Session {
    Session {
        display_name: display_name.to_owned(),
        unit_system: "metric".to_owned(),
        session_cookies: [("SESSIONID".to_owned(), "saved-app".to_owned())].into(),
        login_cookies: [("CASTGC".to_owned(), "TGT-saved".to_owned())].into(),
    }
}
