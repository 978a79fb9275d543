// ABOUTME: Request-side models for the Connect data facade
// ABOUTME: Activity download formats with their endpoint and file extension
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::Endpoint;
use crate::errors::GarminError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Export format for [`crate::GarminConnect::download_activity`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityDownloadFormat {
    /// Original upload, zipped FIT file
    Original,
    /// Training Center XML
    #[default]
    Tcx,
    /// GPS Exchange Format
    Gpx,
    /// Keyhole Markup Language
    Kml,
    /// Splits as CSV
    Csv,
}

impl ActivityDownloadFormat {
    /// Every supported format
    pub const ALL: [Self; 5] = [Self::Original, Self::Tcx, Self::Gpx, Self::Kml, Self::Csv];

    /// Download endpoint for this format
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::Original => Endpoint::FitDownload,
            Self::Tcx => Endpoint::TcxDownload,
            Self::Gpx => Endpoint::GpxDownload,
            Self::Kml => Endpoint::KmlDownload,
            Self::Csv => Endpoint::CsvDownload,
        }
    }

    /// Path for one activity
    #[must_use]
    pub fn path(self, activity_id: &str) -> String {
        self.endpoint().with_segments(&[activity_id])
    }

    /// Conventional file extension of the downloaded bytes
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Original => "zip",
            Self::Tcx => "tcx",
            Self::Gpx => "gpx",
            Self::Kml => "kml",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for ActivityDownloadFormat {
    type Err = GarminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" | "zip" | "fit" => Ok(Self::Original),
            "tcx" => Ok(Self::Tcx),
            "gpx" => Ok(Self::Gpx),
            "kml" => Ok(Self::Kml),
            "csv" => Ok(Self::Csv),
            other => Err(GarminError::Config(format!(
                "unknown activity download format '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ActivityDownloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Original => "original",
            Self::Tcx => "tcx",
            Self::Gpx => "gpx",
            Self::Kml => "kml",
            Self::Csv => "csv",
        };
        f.write_str(name)
    }
}
