// ABOUTME: Garmin SSO login state machine - cookie resume with fallback to credential login
// ABOUTME: Drives the sign-in widget handshake, ticket exchange, and session snapshotting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Manager
//!
//! `login()` either validates a previously saved [`Session`] against the SSO
//! host or runs the full credential handshake:
//!
//! 1. clear both cookie domains
//! 2. GET the sign-in widget and scrape its `_csrf` token
//! 3. POST the credentials with that token
//! 4. scrape the one-time `?ticket=` from the response
//! 5. GET the application root with the ticket, which sets application cookies
//! 6. scrape the embedded profile blocks and snapshot both cookie domains
//!
//! Resume failures of any kind fall back to step 1. Failures inside the
//! credential handshake are terminal for that `login()` call.

use super::scrape::{extract_csrf_token, extract_service_ticket, ViewerProfile};
use super::session::Session;
use crate::config::{ConnectConfig, Credentials};
use crate::constants::{browser, sso, Endpoint};
use crate::errors::{AuthFailure, GarminError, GarminResult};
use crate::http::{CookieDomain, EndpointClient, EndpointConfig, Transport};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, REFERER};
use std::fmt;
use tracing::{debug, error, info, warn};

/// Where the login state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// No session established
    Unauthenticated,
    /// Validating restored cookies
    ResumeAttempted,
    /// Running the credential handshake
    Authenticating,
    /// Session established
    Authenticated,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::ResumeAttempted => "resume_attempted",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

/// Which path a successful `login()` took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Saved cookies were still valid for the saved identity
    Resumed,
    /// Credentials were exchanged for a new session
    Authenticated,
}

/// Reasons a saved session was not accepted
#[derive(Debug, thiserror::Error)]
enum ResumeRejection {
    #[error("validation request failed: {0}")]
    Request(#[source] GarminError),

    #[error("session expired: {0}")]
    Expired(#[source] AuthFailure),

    #[error("session belongs to '{actual}', expected '{expected}'")]
    IdentityMismatch { expected: String, actual: String },
}

/// Owns the two endpoint clients and the login state
#[derive(Debug)]
pub struct Authenticator {
    credentials: Credentials,
    config: ConnectConfig,
    sso: EndpointClient,
    app: EndpointClient,
    state: LoginState,
    session: Option<Session>,
    profile: Option<ViewerProfile>,
}

impl Authenticator {
    /// Build the transport and both endpoint clients
    ///
    /// A `saved` session is not contacted until [`Authenticator::login`].
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built or a configured URL
    /// or header is invalid
    pub fn new(
        credentials: Credentials,
        config: ConnectConfig,
        saved: Option<Session>,
    ) -> GarminResult<Self> {
        let transport = Transport::new(&config)?;
        let (nk_name, nk_value) = browser::NK_HEADER;

        let sso = EndpointClient::new(
            transport.clone(),
            CookieDomain::Sso,
            EndpointConfig::new(config.sso_base_url.clone()).with_extra_header(nk_name, nk_value)?,
        );
        let app = EndpointClient::new(
            transport,
            CookieDomain::Application,
            EndpointConfig::new(config.app_base_url.clone()).with_extra_header(nk_name, nk_value)?,
        );

        Ok(Self {
            credentials,
            config,
            sso,
            app,
            state: LoginState::Unauthenticated,
            session: saved,
            profile: None,
        })
    }

    /// Establish a session, resuming saved cookies when possible
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` when the sign-in page has no CSRF token,
    /// the login response has no ticket, or the application page lacks the
    /// profile blocks; HTTP failures surface as their mapped error. Resume
    /// failures never surface here.
    pub async fn login(&mut self) -> GarminResult<LoginOutcome> {
        if let Some(saved) = self.session.clone() {
            debug!("login with cookies");
            self.state = LoginState::ResumeAttempted;
            match self.resume(&saved).await {
                Ok(profile) => {
                    info!(display_name = %profile.display_name, "Resumed saved Garmin session");
                    self.session = Some(Session::capture(
                        self.app.jar(),
                        &profile.display_name,
                        &profile.unit_system,
                    ));
                    self.profile = Some(profile);
                    self.state = LoginState::Authenticated;
                    return Ok(LoginOutcome::Resumed);
                }
                Err(rejection) => {
                    debug!(reason = %rejection, "Session not valid, authenticating again");
                }
            }
        }

        match self.authenticate().await {
            Ok(()) => Ok(LoginOutcome::Authenticated),
            Err(e) => {
                self.state = LoginState::Unauthenticated;
                Err(e)
            }
        }
    }

    async fn resume(&self, saved: &Session) -> Result<ViewerProfile, ResumeRejection> {
        debug!("Set cookies in session");
        saved.restore_into(self.app.jar());

        let params = [
            ("service", format!("{}/", self.app.base_url())),
            ("webhost", self.config.connect_base_url.clone()),
            ("gateway", "true".to_owned()),
            ("generateExtraServiceTicket", "true".to_owned()),
            ("generateTwoExtraServiceTickets", "true".to_owned()),
        ];

        debug!("Get page data with cookies");
        let response = self
            .sso
            .get(sso::LOGIN_PATH, None, &params)
            .await
            .map_err(ResumeRejection::Request)?;
        debug!(status = response.status().as_u16(), "Session response");

        let profile =
            ViewerProfile::from_html(&response.text()).map_err(ResumeRejection::Expired)?;
        debug!(display_name = %profile.display_name, unit_system = %profile.unit_system, "Profile from saved session");

        if profile.display_name != saved.display_name {
            return Err(ResumeRejection::IdentityMismatch {
                expected: saved.display_name.clone(),
                actual: profile.display_name,
            });
        }

        Ok(profile)
    }

    /// Run the full credential handshake
    async fn authenticate(&mut self) -> GarminResult<()> {
        debug!(username = %self.credentials.username(), "login");
        self.state = LoginState::Authenticating;
        self.profile = None;
        self.app.jar().clear(CookieDomain::Application);
        self.sso.jar().clear(CookieDomain::Sso);

        let params = self.sign_in_params();

        let mut get_headers = HeaderMap::new();
        get_headers.insert(REFERER, header_value(&self.config.login_page_url)?);
        let response = self
            .sso
            .get(sso::SIGNIN_PATH, Some(&get_headers), &params)
            .await?;

        let Some(csrf) = extract_csrf_token(&response.text()) else {
            let status = response.status().as_u16();
            error!(status, "_csrf not found");
            return Err(AuthFailure::MissingCsrfToken { status }.into());
        };
        let referer = response.url().to_owned();
        debug!(%referer, "_csrf found");

        let form = [
            ("username", self.credentials.username()),
            ("password", self.credentials.password()),
            ("embed", "false"),
            ("_csrf", csrf.as_str()),
        ];
        let mut post_headers = HeaderMap::new();
        post_headers.insert(REFERER, header_value(&referer)?);
        post_headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let response = self
            .sso
            .post(sso::SIGNIN_PATH, Some(&post_headers), &params, &form)
            .await?;

        let Some(ticket) = extract_service_ticket(&response.text()) else {
            let status = response.status().as_u16();
            error!(status, "Login ticket not found");
            return Err(AuthFailure::MissingServiceTicket { status }.into());
        };

        let response = self.app.get("", None, &[("ticket", ticket)]).await?;
        let profile = ViewerProfile::from_html(&response.text())?;
        debug!(display_name = %profile.display_name, unit_system = %profile.unit_system, "Profile from login");

        self.session = Some(Session::capture(
            self.app.jar(),
            &profile.display_name,
            &profile.unit_system,
        ));
        info!(display_name = %profile.display_name, "Authenticated with Garmin Connect");
        self.profile = Some(profile);
        self.state = LoginState::Authenticated;
        Ok(())
    }

    /// Query parameters of the embedded sign-in widget, for both the GET and the POST
    #[must_use]
    pub fn sign_in_params(&self) -> Vec<(&'static str, String)> {
        let app_url = self.app.base_url().to_owned();
        let flag = |value: bool| value.to_string();

        vec![
            ("service", app_url.clone()),
            ("webhost", self.config.connect_base_url.clone()),
            ("source", self.config.login_page_url.clone()),
            ("redirectAfterAccountLoginUrl", app_url.clone()),
            ("redirectAfterAccountCreationUrl", app_url),
            ("gauthHost", self.sso.base_url().to_owned()),
            ("locale", sso::LOCALE.to_owned()),
            ("id", sso::WIDGET_ID.to_owned()),
            ("cssUrl", self.config.css_url.clone()),
            ("privacyStatementUrl", sso::PRIVACY_STATEMENT_URL.to_owned()),
            ("clientId", sso::CLIENT_ID.to_owned()),
            ("rememberMeShown", flag(true)),
            ("rememberMeChecked", flag(false)),
            ("createAccountShown", flag(true)),
            ("openCreateAccount", flag(false)),
            ("displayNameShown", flag(false)),
            ("consumeServiceTicket", flag(false)),
            ("initialFocus", flag(true)),
            ("embedWidget", flag(false)),
            ("generateExtraServiceTicket", flag(true)),
            ("generateTwoExtraServiceTickets", flag(false)),
            ("generateNoServiceTicket", flag(false)),
            ("globalOptInShown", flag(true)),
            ("globalOptInChecked", flag(false)),
            ("mobile", flag(false)),
            ("connectLegalTerms", flag(true)),
            ("locationPromptShown", flag(true)),
            ("showPassword", flag(true)),
        ]
    }

    /// End the session on the server and forget it locally
    ///
    /// Local state is cleared even when the logout request fails.
    ///
    /// # Errors
    ///
    /// Returns the mapped error of the logout request
    pub async fn logout(&mut self) -> GarminResult<()> {
        let result = self.app.get(Endpoint::Logout.path(), None, &[]).await;
        if let Err(e) = &result {
            warn!(error = %e, "Logout request failed - clearing local session anyway");
        }

        self.app.jar().clear(CookieDomain::Application);
        self.sso.jar().clear(CookieDomain::Sso);
        self.session = None;
        self.profile = None;
        self.state = LoginState::Unauthenticated;
        result.map(|_| ())
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// True once `login()` has succeeded
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == LoginState::Authenticated
    }

    /// Snapshot to persist for a later resume
    ///
    /// Before `login()` this is the saved session passed at construction.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Profile scraped by the last successful login
    #[must_use]
    pub const fn profile(&self) -> Option<&ViewerProfile> {
        self.profile.as_ref()
    }

    /// Display name of the authenticated identity
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed(NotLoggedIn)` before a successful login
    pub fn display_name(&self) -> GarminResult<&str> {
        self.profile
            .as_ref()
            .filter(|_| self.is_authenticated())
            .map(|profile| profile.display_name.as_str())
            .ok_or(GarminError::AuthenticationFailed(AuthFailure::NotLoggedIn))
    }

    /// Client for the Connect application host
    #[must_use]
    pub const fn app(&self) -> &EndpointClient {
        &self.app
    }
}

fn header_value(value: &str) -> GarminResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| GarminError::Config(format!("invalid header value '{value}': {e}")))
}
