// ABOUTME: Client configuration - region selection, host URLs, credentials, and HTTP timeouts
// ABOUTME: Environment-driven defaults with explicit overrides for tests and custom deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{browser, hosts, timeouts};
use crate::errors::{GarminError, GarminResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which Garmin endpoint set to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// `garmin.com`
    #[default]
    Global,
    /// `garmin.cn`
    China,
}

impl FromStr for Region {
    type Err = GarminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" | "com" | "international" => Ok(Self::Global),
            "china" | "cn" => Ok(Self::China),
            other => Err(GarminError::Config(format!("unknown region '{other}'"))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::China => f.write_str("china"),
        }
    }
}

/// Account credentials, fixed for the lifetime of a client
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials from a username (email) and password
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Account username
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Host URLs and transport settings for one client instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Region the URLs were derived from
    pub region: Region,
    /// SSO base URL (no trailing slash)
    pub sso_base_url: String,
    /// Connect application base URL (no trailing slash)
    pub app_base_url: String,
    /// Connect web host, sent as `webhost`
    pub connect_base_url: String,
    /// Public sign-in page, sent as `Referer` and `source`
    pub login_page_url: String,
    /// Widget stylesheet, sent as `cssUrl`
    pub css_url: String,
    /// Browser user agent
    pub user_agent: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self::for_region(Region::Global)
    }
}

impl ConnectConfig {
    /// Production URLs for a region
    #[must_use]
    pub fn for_region(region: Region) -> Self {
        let (sso, app, connect, css) = match region {
            Region::Global => (
                hosts::GLOBAL_SSO,
                hosts::GLOBAL_APP,
                hosts::GLOBAL_CONNECT,
                hosts::GLOBAL_CSS,
            ),
            Region::China => (
                hosts::CHINA_SSO,
                hosts::CHINA_APP,
                hosts::CHINA_CONNECT,
                hosts::CHINA_CSS,
            ),
        };

        Self {
            region,
            sso_base_url: sso.to_owned(),
            app_base_url: app.to_owned(),
            connect_base_url: connect.to_owned(),
            login_page_url: format!("{connect}/{}", hosts::LOGIN_PAGE_PATH),
            css_url: css.to_owned(),
            user_agent: browser::USER_AGENT.to_owned(),
            timeout: Duration::from_secs(timeouts::HTTP_CLIENT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(timeouts::HTTP_CLIENT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Point every host at one base URL, keeping the production path layout
    ///
    /// The SSO host becomes `<base>/sso`, the application host `<base>/modern`
    /// and the web host `<base>`. Used to run against a local mock.
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.sso_base_url = format!("{base}/sso");
        self.app_base_url = format!("{base}/modern");
        self.connect_base_url = base.to_owned();
        self.login_page_url = format!("{base}/{}", hosts::LOGIN_PAGE_PATH);
        self
    }

    /// Load configuration from environment variables
    ///
    /// Reads `GARMIN_REGION`, `GARMIN_HTTP_TIMEOUT_SECS`,
    /// `GARMIN_HTTP_CONNECT_TIMEOUT_SECS` and `GARMIN_USER_AGENT`.
    ///
    /// # Errors
    ///
    /// Returns an error if `GARMIN_REGION` names an unknown region
    pub fn from_env() -> GarminResult<Self> {
        let region = env::var("GARMIN_REGION")
            .ok()
            .map(|value| value.parse::<Region>())
            .transpose()?
            .unwrap_or_default();

        let mut config = Self::for_region(region);
        config.timeout = Duration::from_secs(
            env::var("GARMIN_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(timeouts::HTTP_CLIENT_TIMEOUT_SECS),
        );
        config.connect_timeout = Duration::from_secs(
            env::var("GARMIN_HTTP_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(timeouts::HTTP_CLIENT_CONNECT_TIMEOUT_SECS),
        );
        if let Ok(user_agent) = env::var("GARMIN_USER_AGENT") {
            if !user_agent.trim().is_empty() {
                config.user_agent = user_agent;
            }
        }

        Ok(config)
    }
}
