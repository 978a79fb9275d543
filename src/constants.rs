// ABOUTME: Static Garmin Connect endpoint table, host names, and SSO widget constants
// ABOUTME: Single source of truth for URL paths and the browser identity presented to Garmin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application constants organized by domain

/// Production host names per region
pub mod hosts {
    /// SSO base URL, global region
    pub const GLOBAL_SSO: &str = "https://sso.garmin.com/sso";
    /// Connect application base URL, global region
    pub const GLOBAL_APP: &str = "https://connect.garmin.com/modern";
    /// Connect web host, global region
    pub const GLOBAL_CONNECT: &str = "https://connect.garmin.com";
    /// Widget stylesheet, global region
    pub const GLOBAL_CSS: &str =
        "https://static.garmincdn.com/com.garmin.connect/ui/css/gauth-custom-v1.2-min.css";

    /// SSO base URL, China region
    pub const CHINA_SSO: &str = "https://sso.garmin.cn/sso";
    /// Connect application base URL, China region
    pub const CHINA_APP: &str = "https://connect.garmin.cn/modern";
    /// Connect web host, China region
    pub const CHINA_CONNECT: &str = "https://connect.garmin.cn";
    /// Widget stylesheet, China region
    pub const CHINA_CSS: &str =
        "https://static.garmincdn.cn/cn.garmin.connect/ui/css/gauth-custom-v1.2-min.css";

    /// Public sign-in page path below the web host, used as `Referer` and `source`
    pub const LOGIN_PAGE_PATH: &str = "en-US/signin";
}

/// Browser identity presented on every request
pub mod browser {
    /// Desktop Firefox user agent
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.14; rv:66.0) Gecko/20100101 Firefox/66.0";
    /// `Accept` header a browser sends for page navigations
    pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
    /// `Accept-Language` header
    pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
    /// Extra header Garmin's own web client sends to both hosts
    pub const NK_HEADER: (&str, &str) = ("NK", "NT");
}

/// SSO sign-in widget parameters and scraping markers
pub mod sso {
    /// Path of the embedded sign-in widget on the SSO host
    pub const SIGNIN_PATH: &str = "signin";
    /// Path used to validate restored cookies
    pub const LOGIN_PATH: &str = "login";
    /// Widget locale
    pub const LOCALE: &str = "en_US";
    /// Widget DOM id
    pub const WIDGET_ID: &str = "gauth-widget";
    /// Privacy statement link shown in the widget
    pub const PRIVACY_STATEMENT_URL: &str = "//connect.garmin.com/en-US/privacy/";
    /// OAuth-style client identifier expected by the SSO host
    pub const CLIENT_ID: &str = "GarminConnect";

    /// Embedded JavaScript variable holding user preferences
    pub const USER_PREFERENCES_KEY: &str = "VIEWER_USERPREFERENCES";
    /// Embedded JavaScript variable holding the social profile
    pub const SOCIAL_PROFILE_KEY: &str = "VIEWER_SOCIAL_PROFILE";
}

/// Data access limits
pub mod limits {
    /// Page size the web interface uses when scrolling the activity list
    pub const ACTIVITY_PAGE_SIZE: u32 = 20;
    /// Default `maxChartSize` for activity details
    pub const DEFAULT_MAX_CHART_SIZE: u32 = 2000;
    /// Default `maxPolylineSize` for activity details
    pub const DEFAULT_MAX_POLYLINE_SIZE: u32 = 4000;
    /// Non-sleep buffer requested with daily sleep data
    pub const SLEEP_NON_SLEEP_BUFFER_MINUTES: u32 = 60;
    /// Metric id of resting heart rate in the user stats service
    pub const RESTING_HEART_RATE_METRIC_ID: u32 = 60;
}

/// Default HTTP timeouts
pub mod timeouts {
    /// Request timeout in seconds
    pub const HTTP_CLIENT_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout in seconds
    pub const HTTP_CLIENT_CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Symbolic names for every Connect application endpoint
///
/// Paths are relative to the application base URL. Parameterised endpoints
/// take the display name, a date, or an id appended as further path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Registered devices
    Devices,
    /// Device service root (settings, last used)
    DeviceService,
    /// Body composition over a date range
    WeightDateRange,
    /// Daily user summary
    DailySummary,
    /// VO2 max and fitness age
    MaxMetrics,
    /// Daily hydration
    DailyHydration,
    /// Personal records
    PersonalRecords,
    /// Earned badges
    EarnedBadges,
    /// Historical ad-hoc challenges
    AdhocChallenges,
    /// Completed badge challenges
    BadgeChallenges,
    /// Available badge challenges
    AvailableBadgeChallenges,
    /// Badge challenges not yet completed
    NonCompletedBadgeChallenges,
    /// Daily sleep
    DailySleep,
    /// Daily stress
    DailyStress,
    /// Resting heart rate
    RestingHeartRate,
    /// Daily step chart
    DailySummaryChart,
    /// Daily heart rate
    DailyHeartRate,
    /// Daily respiration
    DailyRespiration,
    /// Daily `SpO2`
    DailySpo2,
    /// Activity search
    Activities,
    /// Single activity
    Activity,
    /// Original FIT/zip download
    FitDownload,
    /// TCX export
    TcxDownload,
    /// GPX export
    GpxDownload,
    /// KML export
    KmlDownload,
    /// CSV splits export
    CsvDownload,
    /// Gear lookup
    Gear,
    /// Session logout
    Logout,
}

impl Endpoint {
    /// Path template below the application base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Devices => "proxy/device-service/deviceregistration/devices",
            Self::DeviceService => "proxy/device-service/deviceservice",
            Self::WeightDateRange => "proxy/weight-service/weight/dateRange",
            Self::DailySummary => "proxy/usersummary-service/usersummary/daily",
            Self::MaxMetrics => "proxy/metrics-service/metrics/maxmet/daily",
            Self::DailyHydration => "proxy/usersummary-service/usersummary/hydration/daily",
            Self::PersonalRecords => "proxy/personalrecord-service/personalrecord/prs",
            Self::EarnedBadges => "proxy/badge-service/badge/earned",
            Self::AdhocChallenges => "proxy/adhocchallenge-service/adHocChallenge/historical",
            Self::BadgeChallenges => "proxy/badgechallenge-service/badgeChallenge/completed",
            Self::AvailableBadgeChallenges => {
                "proxy/badgechallenge-service/badgeChallenge/available"
            }
            Self::NonCompletedBadgeChallenges => {
                "proxy/badgechallenge-service/badgeChallenge/non-completed"
            }
            Self::DailySleep => "proxy/wellness-service/wellness/dailySleepData",
            Self::DailyStress => "proxy/wellness-service/wellness/dailyStress",
            Self::RestingHeartRate => "proxy/userstats-service/wellness/daily",
            Self::DailySummaryChart => "proxy/wellness-service/wellness/dailySummaryChart",
            Self::DailyHeartRate => "proxy/wellness-service/wellness/dailyHeartRate",
            Self::DailyRespiration => "proxy/wellness-service/wellness/daily/respiration",
            Self::DailySpo2 => "proxy/wellness-service/wellness/daily/spo2",
            Self::Activities => "proxy/activitylist-service/activities/search/activities",
            Self::Activity => "proxy/activity-service/activity",
            Self::FitDownload => "proxy/download-service/files/activity",
            Self::TcxDownload => "proxy/download-service/export/tcx/activity",
            Self::GpxDownload => "proxy/download-service/export/gpx/activity",
            Self::KmlDownload => "proxy/download-service/export/kml/activity",
            Self::CsvDownload => "proxy/download-service/export/csv/activity",
            Self::Gear => "proxy/gear-service/gear/filterGear",
            Self::Logout => "auth/logout/?url=",
        }
    }

    /// Path with additional segments joined by `/`, each percent-encoded
    #[must_use]
    pub fn with_segments(self, segments: &[&str]) -> String {
        let mut path = self.path().to_owned();
        for segment in segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_appended_in_order() {
        assert_eq!(
            Endpoint::MaxMetrics.with_segments(&["2024-03-01", "2024-03-01"]),
            "proxy/metrics-service/metrics/maxmet/daily/2024-03-01/2024-03-01"
        );
        assert_eq!(
            Endpoint::Activity.with_segments(&["123", "splits"]),
            "proxy/activity-service/activity/123/splits"
        );
    }

    #[test]
    fn test_segments_cannot_escape_the_path() {
        assert_eq!(
            Endpoint::DeviceService.with_segments(&["device-info", "settings", "a/b?x=1"]),
            "proxy/device-service/deviceservice/device-info/settings/a%2Fb%3Fx%3D1"
        );
    }

    #[test]
    fn test_bare_path_has_no_trailing_slash() {
        assert_eq!(Endpoint::Devices.with_segments(&[]), Endpoint::Devices.path());
        assert!(!Endpoint::Gear.path().ends_with('/'));
    }
}
