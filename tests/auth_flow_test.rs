// ABOUTME: Integration tests for the credential login handshake against a mock SSO host
// ABOUTME: Covers the happy path, missing CSRF token, missing ticket, and logout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    credentials, init_test_logging, logged_in_client, mount_credential_login, signin_page,
    test_config, DISPLAY_NAME, FULL_NAME,
};
use pierre_garmin_connect::http::CookieDomain;
use pierre_garmin_connect::{
    AuthFailure, GarminConnect, GarminError, LoginOutcome, LoginState,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_credential_login_establishes_session() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    assert_eq!(client.state(), LoginState::Authenticated);
    assert_eq!(client.display_name().unwrap(), DISPLAY_NAME);
    assert_eq!(client.full_name(), Some(FULL_NAME));
    assert_eq!(client.unit_system(), Some("metric"));

    let session = client.session().unwrap();
    assert_eq!(session.display_name, DISPLAY_NAME);
    assert_eq!(
        session.session_cookies.get("SESSIONID").map(String::as_str),
        Some("app-session-1")
    );
    assert_eq!(
        session.login_cookies.get("CASTGC").map(String::as_str),
        Some("TGT-1-cas")
    );
    assert!(!session.session_cookies.contains_key("CASTGC"));
}

#[tokio::test]
async fn test_sign_in_requests_carry_widget_parameters_and_headers() {
    init_test_logging();
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("GET"))
        .and(path("/sso/signin"))
        .and(query_param("service", config.app_base_url.as_str()))
        .and(query_param("gauthHost", config.sso_base_url.as_str()))
        .and(query_param("source", config.login_page_url.as_str()))
        .and(query_param("embedWidget", "false"))
        .and(header("NK", "NT"))
        .and(header("referer", config.login_page_url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(signin_page()))
        .expect(1)
        .mount(&server)
        .await;
    // The POST returns no ticket; only the GET is under test here
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = GarminConnect::with_config(credentials(), config, None).unwrap();
    let err = client.login().await.unwrap_err();
    assert!(matches!(
        err,
        GarminError::AuthenticationFailed(AuthFailure::MissingServiceTicket { status: 200 })
    ));
}

#[tokio::test]
async fn test_missing_csrf_token_fails_before_posting_credentials() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = GarminConnect::with_config(credentials(), test_config(&server), None).unwrap();
    let err = client.login().await.unwrap_err();

    assert!(matches!(
        err,
        GarminError::AuthenticationFailed(AuthFailure::MissingCsrfToken { status: 200 })
    ));
    assert!(err.is_auth_failure());
    assert_eq!(client.state(), LoginState::Unauthenticated);
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_rejected_credentials_surface_missing_ticket() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string(signin_page()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sso/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<div class=\"error\">Invalid sign in</div>"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/modern/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = GarminConnect::with_config(credentials(), test_config(&server), None).unwrap();
    let err = client.login().await.unwrap_err();

    assert!(matches!(
        err,
        GarminError::AuthenticationFailed(AuthFailure::MissingServiceTicket { .. })
    ));
    assert!(client.display_name().is_err());
}

#[tokio::test]
async fn test_sso_rate_limit_is_reported_with_url() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sso/signin"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let mut client = GarminConnect::with_config(credentials(), test_config(&server), None).unwrap();
    let err = client.login().await.unwrap_err();

    match err {
        GarminError::RateLimitExceeded { url } => {
            assert_eq!(url, format!("{}/sso/signin", server.uri()));
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn test_relogin_after_failed_resume_drops_stale_cookies() {
    let server = MockServer::start().await;
    let mut client = logged_in_client(&server).await;
    server.reset().await;
    mount_credential_login(&server, 1).await;

    let jar = client.authenticator().app().jar().clone();
    jar.restore(
        CookieDomain::Application,
        &[("STALE".to_owned(), "x".to_owned())].into(),
    );

    // No SSO login page is mounted, so the resume gets a 404 and falls back
    assert_eq!(client.login().await.unwrap(), LoginOutcome::Authenticated);
    assert!(!client
        .session()
        .unwrap()
        .session_cookies
        .contains_key("STALE"));

    Mock::given(method("GET"))
        .and(path("/modern/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    client.logout().await.unwrap();
    assert_eq!(client.state(), LoginState::Unauthenticated);
    assert!(client.session().is_none());
    assert!(jar.is_empty(CookieDomain::Application));
    assert!(jar.is_empty(CookieDomain::Sso));
}

#[tokio::test]
async fn test_logout_clears_local_state_even_when_request_fails() {
    let server = MockServer::start().await;
    let mut client = logged_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/modern/auth/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert_eq!(client.state(), LoginState::Unauthenticated);
    assert!(client.session().is_none());
    assert!(matches!(
        client.display_name(),
        Err(GarminError::AuthenticationFailed(AuthFailure::NotLoggedIn))
    ));
}
