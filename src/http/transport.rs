// ABOUTME: Browser-impersonating HTTP transport with a persistent shared cookie jar
// ABOUTME: Builds one reqwest client per Garmin session with configured timeouts and headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::cookies::CookieJar;
use crate::config::ConnectConfig;
use crate::constants::browser;
use crate::errors::{GarminError, GarminResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;

/// HTTP transport shared by the SSO and application endpoint clients
///
/// Cloning is cheap: the inner `reqwest::Client` and the jar are both
/// reference counted, so every clone sees the same cookies.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    jar: Arc<CookieJar>,
}

impl Transport {
    /// Build the transport for a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent is not a valid header value or the
    /// TLS backend fails to initialise
    pub fn new(config: &ConnectConfig) -> GarminResult<Self> {
        let jar = Arc::new(CookieJar::new());

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| GarminError::Config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(browser::ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(browser::ACCEPT_LANGUAGE),
        );

        let client = ClientBuilder::new()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GarminError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, jar })
    }

    /// Underlying HTTP client
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Cookie jar shared by every request on this transport
    #[must_use]
    pub const fn jar(&self) -> &Arc<CookieJar> {
        &self.jar
    }
}
