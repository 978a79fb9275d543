// ABOUTME: Garmin Connect facade - login lifecycle plus shared helpers for the data accessors
// ABOUTME: Wraps the authenticator and routes typed accessor calls through the application host
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::auth::{Authenticator, LoginOutcome, LoginState, Session};
use crate::config::{ConnectConfig, Credentials, Region};
use crate::constants::Endpoint;
use crate::errors::GarminResult;
use crate::http::EndpointClient;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

/// Authenticated client for Garmin Connect wellness and activity data
///
/// ```no_run
/// # async fn run() -> pierre_garmin_connect::GarminResult<()> {
/// use pierre_garmin_connect::{GarminConnect, Region};
///
/// let mut client = GarminConnect::new("runner@example.com", "secret", Region::Global)?;
/// client.login().await?;
/// let today = chrono::Local::now().date_naive();
/// let summary = client.get_user_summary(today).await?;
/// println!("{summary}");
///
/// // Persist for next time
/// let blob = client.export_session()?;
/// # let _ = blob;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GarminConnect {
    auth: Authenticator,
}

impl GarminConnect {
    /// Client for the production hosts of a region
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        region: Region,
    ) -> GarminResult<Self> {
        Self::with_config(
            Credentials::new(username, password),
            ConnectConfig::for_region(region),
            None,
        )
    }

    /// Client with explicit configuration and an optional saved session
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built
    pub fn with_config(
        credentials: Credentials,
        config: ConnectConfig,
        session: Option<Session>,
    ) -> GarminResult<Self> {
        Ok(Self {
            auth: Authenticator::new(credentials, config, session)?,
        })
    }

    /// Client resuming from a blob produced by [`GarminConnect::export_session`]
    ///
    /// # Errors
    ///
    /// Returns `Session` if the blob cannot be decoded
    pub fn with_session_json(
        credentials: Credentials,
        config: ConnectConfig,
        session_json: &str,
    ) -> GarminResult<Self> {
        let session = Session::from_json(session_json)?;
        Self::with_config(credentials, config, Some(session))
    }

    /// Authenticate, resuming the saved session when it is still valid
    ///
    /// # Errors
    ///
    /// See [`Authenticator::login`]
    pub async fn login(&mut self) -> GarminResult<LoginOutcome> {
        self.auth.login().await
    }

    /// Log out of Connect and drop the local session
    ///
    /// # Errors
    ///
    /// Returns the mapped error of the logout request
    pub async fn logout(&mut self) -> GarminResult<()> {
        self.auth.logout().await
    }

    /// Session snapshot to persist
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.auth.session()
    }

    /// Session snapshot as JSON, `None` encoded as `null`
    ///
    /// # Errors
    ///
    /// Returns `Session` if serialization fails
    pub fn export_session(&self) -> GarminResult<String> {
        serde_json::to_string(&self.auth.session()).map_err(crate::errors::GarminError::Session)
    }

    /// Login state
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.auth.state()
    }

    /// Display name of the logged-in user
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed(NotLoggedIn)` before login
    pub fn display_name(&self) -> GarminResult<&str> {
        self.auth.display_name()
    }

    /// Full name of the logged-in user
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.auth.profile().map(|p| p.full_name.as_str())
    }

    /// Measurement system of the logged-in user
    #[must_use]
    pub fn unit_system(&self) -> Option<&str> {
        self.auth.profile().map(|p| p.unit_system.as_str())
    }

    /// The underlying session manager
    #[must_use]
    pub const fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    pub(crate) fn app(&self) -> &EndpointClient {
        self.auth.app()
    }

    /// Path of a per-user endpoint, `<endpoint>/<display name>`
    pub(crate) fn user_path(&self, endpoint: Endpoint) -> GarminResult<String> {
        Ok(endpoint.with_segments(&[self.display_name()?]))
    }

    /// GET an application path and decode the JSON body
    pub(crate) async fn fetch_json(
        &self,
        what: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> GarminResult<Value> {
        debug!(%path, "Requesting {what}");
        self.app().get(path, None, params).await?.json()
    }
}

/// `YYYY-MM-DD`
pub(crate) fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
