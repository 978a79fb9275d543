// ABOUTME: Integration tests for the endpoint client against a mock Connect host
// ABOUTME: Status-to-error mapping, header merging, and cookie partitioning on the wire
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{init_test_logging, test_config};
use pierre_garmin_connect::http::{CookieDomain, EndpointClient, EndpointConfig, Transport};
use pierre_garmin_connect::{AuthFailure, ConnectionFailure, GarminError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Clients {
    sso: EndpointClient,
    app: EndpointClient,
}

fn clients(server: &MockServer) -> Clients {
    init_test_logging();
    let config = test_config(server);
    let transport = Transport::new(&config).unwrap();
    Clients {
        sso: EndpointClient::new(
            transport.clone(),
            CookieDomain::Sso,
            EndpointConfig::new(config.sso_base_url.clone()),
        ),
        app: EndpointClient::new(
            transport,
            CookieDomain::Application,
            EndpointConfig::new(config.app_base_url)
                .with_extra_header("NK", "NT")
                .unwrap(),
        ),
    }
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_status_codes_map_to_domain_errors() {
    let server = MockServer::start().await;
    let Clients { app, .. } = clients(&server);
    mount_status(&server, "/modern/limited", 429).await;
    mount_status(&server, "/modern/unauthorized", 401).await;
    mount_status(&server, "/modern/forbidden", 403).await;
    mount_status(&server, "/modern/broken", 500).await;

    let err = app.get("limited", None, &[]).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert!(
        matches!(&err, GarminError::RateLimitExceeded { url } if url == &format!("{}/modern/limited", server.uri()))
    );

    let err = app.get("unauthorized", None, &[]).await.unwrap_err();
    assert!(matches!(
        err,
        GarminError::AuthenticationFailed(AuthFailure::Unauthorized)
    ));

    let err = app.get("forbidden", None, &[]).await.unwrap_err();
    let forbidden_url = format!("{}/modern/forbidden", server.uri());
    assert_eq!(err.forbidden_url(), Some(forbidden_url.as_str()));
    assert!(err.to_string().contains(&forbidden_url));

    let err = app.get("broken", None, &[]).await.unwrap_err();
    assert!(matches!(
        err,
        GarminError::ConnectionFailed(ConnectionFailure::HttpStatus { status, .. })
            if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn test_success_decodes_json_and_keeps_params() {
    let server = MockServer::start().await;
    let Clients { app, .. } = clients(&server);

    Mock::given(method("GET"))
        .and(path("/modern/proxy/usersummary-service/usersummary/daily/runner42"))
        .and(query_param("calendarDate", "2024-05-01"))
        .and(header("NK", "NT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalSteps": 12_345})))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .get(
            "proxy/usersummary-service/usersummary/daily/runner42",
            None,
            &[("calendarDate", "2024-05-01".to_owned())],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().unwrap();
    assert_eq!(body["totalSteps"], 12_345);
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    let Clients { app, .. } = clients(&server);
    Mock::given(method("GET"))
        .and(path("/modern/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let response = app.get("html", None, &[]).await.unwrap();
    assert!(matches!(
        response.json::<Value>(),
        Err(GarminError::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_call_headers_override_defaults() {
    let server = MockServer::start().await;
    let Clients { app, .. } = clients(&server);

    Mock::given(method("GET"))
        .and(path("/modern/override"))
        .and(header("NK", "custom"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("NK", HeaderValue::from_static("custom"));
    app.get("override", Some(&headers), &[]).await.unwrap();
}

#[tokio::test]
async fn test_cookies_stay_in_the_domain_that_received_them() {
    let server = MockServer::start().await;
    let Clients { sso, app } = clients(&server);

    Mock::given(method("GET"))
        .and(path("/sso/set"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "CASTGC=tgt; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/modern/set"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "SESSIONID=s1; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sso/echo"))
        .and(header("cookie", "CASTGC=tgt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/modern/echo"))
        .and(header("cookie", "SESSIONID=s1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    sso.get("set", None, &[]).await.unwrap();
    app.get("set", None, &[]).await.unwrap();
    sso.get("echo", None, &[]).await.unwrap();
    app.get("echo", None, &[]).await.unwrap();

    let jar = app.jar();
    assert_eq!(jar.len(CookieDomain::Sso), 1);
    assert_eq!(jar.len(CookieDomain::Application), 1);
}
