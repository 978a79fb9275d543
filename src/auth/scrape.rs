// ABOUTME: Extracts CSRF tokens, service tickets, and embedded JSON blocks from SSO/Connect HTML
// ABOUTME: Explicit not-found and malformed results instead of index-driven failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::sso;
use crate::errors::AuthFailure;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static CSRF_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"name="_csrf" value="(\w*)"#).ok());

static TICKET_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\?ticket=([\w-]*)").ok());

/// Outcome of scanning a page for `<KEY> = {...};`
#[derive(Debug)]
pub enum JsonBlock {
    /// Block found and decoded
    Found(Value),
    /// No assignment for the key on the page
    NotFound,
    /// Assignment found but the object is not valid JSON
    Malformed(serde_json::Error),
}

impl JsonBlock {
    /// Decoded value, discarding the reason for absence
    #[must_use]
    pub fn ok(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Malformed(_) => None,
        }
    }

    /// Decoded value or the authentication failure describing why it is missing
    ///
    /// # Errors
    ///
    /// Returns `MissingProfileBlock` or `MalformedProfileBlock` for `key`
    pub fn require(self, key: &'static str) -> Result<Value, AuthFailure> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound => Err(AuthFailure::MissingProfileBlock { key }),
            Self::Malformed(source) => Err(AuthFailure::MalformedProfileBlock { key, source }),
        }
    }
}

/// Find the first `<key> = {...};` assignment on a single line and decode it
///
/// Escaped quotes (`\"`) are unescaped before decoding, matching how the
/// Connect page embeds these objects inside script tags.
#[must_use]
pub fn extract_json_block(html: &str, key: &str) -> JsonBlock {
    let pattern = format!(r"{} = (\{{.*\}});", regex::escape(key));
    let Ok(regex) = Regex::new(&pattern) else {
        return JsonBlock::NotFound;
    };
    let Some(json_text) = regex
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().replace("\\\"", "\""))
    else {
        return JsonBlock::NotFound;
    };

    match serde_json::from_str(&json_text) {
        Ok(value) => JsonBlock::Found(value),
        Err(e) => JsonBlock::Malformed(e),
    }
}

/// Value of the hidden `_csrf` input on the SSO sign-in page
#[must_use]
pub fn extract_csrf_token(html: &str) -> Option<String> {
    CSRF_PATTERN
        .as_ref()?
        .captures(html)?
        .get(1)
        .map(|m| m.as_str().to_owned())
}

/// One-time service ticket from the `?ticket=` link in the login response
#[must_use]
pub fn extract_service_ticket(html: &str) -> Option<String> {
    TICKET_PATTERN
        .as_ref()?
        .captures(html)?
        .get(1)
        .map(|m| m.as_str().to_owned())
}

/// Identity extracted from the embedded preference and social profile blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerProfile {
    /// Connect display name, used in per-user endpoint paths
    pub display_name: String,
    /// `metric` or `statute_us`
    pub unit_system: String,
    /// Full name as shown on the social profile
    pub full_name: String,
}

impl ViewerProfile {
    /// Scrape both blocks from a page
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] naming the block or field that is missing
    pub fn from_html(html: &str) -> Result<Self, AuthFailure> {
        let preferences = extract_json_block(html, sso::USER_PREFERENCES_KEY)
            .require(sso::USER_PREFERENCES_KEY)?;
        let social = extract_json_block(html, sso::SOCIAL_PROFILE_KEY)
            .require(sso::SOCIAL_PROFILE_KEY)?;

        Ok(Self {
            display_name: string_field(&preferences, sso::USER_PREFERENCES_KEY, "displayName")?,
            unit_system: string_field(&preferences, sso::USER_PREFERENCES_KEY, "measurementSystem")?,
            full_name: string_field(&social, sso::SOCIAL_PROFILE_KEY, "fullName")?,
        })
    }
}

fn string_field(
    block: &Value,
    key: &'static str,
    field: &'static str,
) -> Result<String, AuthFailure> {
    block
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(AuthFailure::MissingProfileField { key, field })
}
