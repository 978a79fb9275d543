// ABOUTME: Endpoint client binding a base host and default headers to the shared transport
// ABOUTME: Issues GET/POST requests and translates non-success statuses into domain errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::cookies::{CookieDomain, CookieJar};
use super::transport::Transport;
use crate::errors::{GarminError, GarminResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Per-client host and header settings
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Headers sent on every request
    pub default_headers: HeaderMap,
    /// Headers layered over the defaults on every request
    pub extra_headers: HeaderMap,
}

impl EndpointConfig {
    /// Config with no per-client headers beyond the transport's
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            default_headers: HeaderMap::new(),
            extra_headers: HeaderMap::new(),
        }
    }

    /// Add a header to `extra_headers`
    ///
    /// # Errors
    ///
    /// Returns an error if the name or value is not a valid HTTP header
    pub fn with_extra_header(mut self, name: &str, value: &str) -> GarminResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| GarminError::Config(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| GarminError::Config(format!("invalid header value: {e}")))?;
        self.extra_headers.insert(name, value);
        Ok(self)
    }
}

/// Fully read response from an endpoint call
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    status: StatusCode,
    url: String,
    body: Vec<u8>,
}

impl EndpointResponse {
    /// Response status
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Final URL after redirects
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Raw body
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Body decoded as JSON
    ///
    /// # Errors
    ///
    /// Returns [`GarminError::InvalidResponse`] if the body is not valid JSON for `T`
    pub fn json<T: DeserializeOwned>(&self) -> GarminResult<T> {
        serde_json::from_slice(&self.body).map_err(|source| GarminError::InvalidResponse {
            context: self.url.clone(),
            source,
        })
    }
}

/// Client for one Garmin host
///
/// Both endpoint clients of a session share one [`Transport`], so cookies the
/// server rotates on either host are visible to later calls.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    transport: Transport,
    base_url: String,
    headers: HeaderMap,
}

impl EndpointClient {
    /// Bind an endpoint config to a transport and cookie domain
    #[must_use]
    pub fn new(transport: Transport, domain: CookieDomain, config: EndpointConfig) -> Self {
        transport.jar().bind(domain, &config.base_url);

        let mut headers = config.default_headers;
        headers.extend(config.extra_headers);

        Self {
            transport,
            base_url: config.base_url,
            headers,
        }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a path below the base
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// The jar shared with the other endpoint client
    #[must_use]
    pub fn jar(&self) -> &Arc<CookieJar> {
        self.transport.jar()
    }

    /// Issue a GET
    ///
    /// # Errors
    ///
    /// Returns the mapped domain error for any non-success status or transport failure
    pub async fn get(
        &self,
        path: &str,
        headers: Option<&HeaderMap>,
        params: &[(&str, String)],
    ) -> GarminResult<EndpointResponse> {
        let url = self.url(path);
        debug!(%url, "GET");
        let request = self.transport.client().get(&url).query(params);
        self.execute(request, headers, &url).await
    }

    /// Issue a form-encoded POST
    ///
    /// # Errors
    ///
    /// Returns the mapped domain error for any non-success status or transport failure
    pub async fn post(
        &self,
        path: &str,
        headers: Option<&HeaderMap>,
        params: &[(&str, String)],
        form: &[(&str, &str)],
    ) -> GarminResult<EndpointResponse> {
        let url = self.url(path);
        debug!(%url, "POST");
        let request = self
            .transport
            .client()
            .post(&url)
            .query(params)
            .form(form);
        self.execute(request, headers, &url).await
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        call_headers: Option<&HeaderMap>,
        url: &str,
    ) -> GarminResult<EndpointResponse> {
        let mut headers = self.headers.clone();
        if let Some(call_headers) = call_headers {
            for (name, value) in call_headers {
                headers.insert(name.clone(), value.clone());
            }
        }

        let response = request.headers(headers).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            debug!(
                %url,
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "Response in error"
            );
            return Err(GarminError::from_status(status, url));
        }

        debug!(%url, status = status.as_u16(), bytes = body.len(), "Response received");
        Ok(EndpointResponse {
            status,
            url: final_url,
            body,
        })
    }
}
