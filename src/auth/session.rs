// ABOUTME: Persistable Garmin session - display name, unit system, and both cookie partitions
// ABOUTME: JSON round trip lets callers resume without re-entering credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{GarminError, GarminResult};
use crate::http::{CookieDomain, CookieJar, CookieMap};
use serde::{Deserialize, Serialize};

/// Saved authentication state
///
/// Opaque to callers beyond storing and restoring it. On resume the stored
/// `display_name` is compared with the identity the server reports for the
/// restored cookies; a mismatch triggers a fresh credential login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Display name of the identity the cookies belong to
    pub display_name: String,
    /// Measurement system reported at login
    #[serde(default)]
    pub unit_system: String,
    /// Connect application host cookies
    #[serde(default)]
    pub session_cookies: CookieMap,
    /// SSO host cookies
    #[serde(default)]
    pub login_cookies: CookieMap,
}

impl Session {
    /// Capture the current jar contents for an identity
    #[must_use]
    pub fn capture(jar: &CookieJar, display_name: &str, unit_system: &str) -> Self {
        Self {
            display_name: display_name.to_owned(),
            unit_system: unit_system.to_owned(),
            session_cookies: jar.snapshot(CookieDomain::Application),
            login_cookies: jar.snapshot(CookieDomain::Sso),
        }
    }

    /// Put both cookie sets back into a jar, each into its own domain
    pub fn restore_into(&self, jar: &CookieJar) {
        jar.restore(CookieDomain::Application, &self.session_cookies);
        jar.restore(CookieDomain::Sso, &self.login_cookies);
    }

    /// Serialize to JSON
    ///
    /// # Errors
    ///
    /// Returns [`GarminError::Session`] if serialization fails
    pub fn to_json(&self) -> GarminResult<String> {
        serde_json::to_string(self).map_err(GarminError::Session)
    }

    /// Deserialize from JSON written by [`Session::to_json`]
    ///
    /// # Errors
    ///
    /// Returns [`GarminError::Session`] if the blob is not a session record
    pub fn from_json(json: &str) -> GarminResult<Self> {
        serde_json::from_str(json).map_err(GarminError::Session)
    }
}
