// ABOUTME: Activity accessors - listings, date-range search, downloads, and per-activity detail
// ABOUTME: Date-range search walks fixed-size pages until the server returns an empty one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::client::{day, GarminConnect};
use crate::constants::{limits, Endpoint};
use crate::errors::{GarminError, GarminResult};
use crate::models::ActivityDownloadFormat;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

impl GarminConnect {
    /// One page of the activity list, newest first
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedShape` if the body is not an array, or any request error
    pub async fn get_activities(&self, start: u32, limit: u32) -> GarminResult<Vec<Value>> {
        let page = self
            .fetch_json(
                "activities",
                Endpoint::Activities.path(),
                &[("start", start.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        into_page(page)
    }

    /// Most recent activity, if any
    ///
    /// # Errors
    ///
    /// Same as [`GarminConnect::get_activities`]
    pub async fn get_last_activity(&self) -> GarminResult<Option<Value>> {
        Ok(self.get_activities(0, 1).await?.into_iter().next())
    }

    /// Every activity between two days (inclusive), optionally of one type
    ///
    /// Pages of twenty are requested at offsets 0, 20, 40 and so on; the first
    /// empty page ends the walk. Pages are concatenated in the order received.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedShape` if a page is not an array, or the first
    /// failing request
    pub async fn get_activities_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        activity_type: Option<&str>,
    ) -> GarminResult<Vec<Value>> {
        let page_size = limits::ACTIVITY_PAGE_SIZE;
        let mut activities = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let mut params = vec![
                ("startDate", day(start)),
                ("endDate", day(end)),
                ("start", offset.to_string()),
                ("limit", page_size.to_string()),
            ];
            if let Some(kind) = activity_type {
                params.push(("activityType", kind.to_owned()));
            }

            let page = into_page(
                self.app()
                    .get(Endpoint::Activities.path(), None, &params)
                    .await?
                    .json()?,
            )?;
            debug!(offset, page_len = page.len(), "Fetched activity page");
            if page.is_empty() {
                break;
            }
            activities.extend(page);
            offset += page_size;
        }

        info!(count = activities.len(), %start, %end, "Fetched activities by date");
        Ok(activities)
    }

    /// Raw export of an activity
    ///
    /// # Errors
    ///
    /// Returns any request error
    pub async fn download_activity(
        &self,
        activity_id: u64,
        format: ActivityDownloadFormat,
    ) -> GarminResult<Vec<u8>> {
        let path = format.path(&activity_id.to_string());
        debug!(%path, %format, "Downloading activity");
        Ok(self.app().get(&path, None, &[]).await?.into_bytes())
    }

    /// Lap splits of an activity
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_splits(&self, activity_id: u64) -> GarminResult<Value> {
        self.activity_part("activity splits", activity_id, Some("splits"), &[])
            .await
    }

    /// Split summaries of an activity
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_split_summaries(&self, activity_id: u64) -> GarminResult<Value> {
        self.activity_part(
            "activity split summaries",
            activity_id,
            Some("split_summaries"),
            &[],
        )
        .await
    }

    /// Weather recorded for an activity
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_weather(&self, activity_id: u64) -> GarminResult<Value> {
        self.activity_part("activity weather", activity_id, Some("weather"), &[])
            .await
    }

    /// Time in each heart rate zone for an activity
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_hr_in_timezones(&self, activity_id: u64) -> GarminResult<Value> {
        self.activity_part(
            "activity heart rate zones",
            activity_id,
            Some("hrTimeInZones"),
            &[],
        )
        .await
    }

    /// Activity summary and self evaluation
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_evaluation(&self, activity_id: u64) -> GarminResult<Value> {
        self.activity_part("activity evaluation", activity_id, None, &[])
            .await
    }

    /// Chart and polyline detail of an activity
    ///
    /// Connect defaults are 2000 chart samples and 4000 polyline points, see
    /// [`limits::DEFAULT_MAX_CHART_SIZE`] and [`limits::DEFAULT_MAX_POLYLINE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_details(
        &self,
        activity_id: u64,
        max_chart_size: u32,
        max_polyline_size: u32,
    ) -> GarminResult<Value> {
        self.activity_part(
            "activity details",
            activity_id,
            Some("details"),
            &[
                ("maxChartSize", max_chart_size.to_string()),
                ("maxPolylineSize", max_polyline_size.to_string()),
            ],
        )
        .await
    }

    /// Gear used for an activity
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_activity_gear(&self, activity_id: u64) -> GarminResult<Value> {
        self.fetch_json(
            "activity gear",
            Endpoint::Gear.path(),
            &[("activityId", activity_id.to_string())],
        )
        .await
    }

    async fn activity_part(
        &self,
        what: &str,
        activity_id: u64,
        part: Option<&str>,
        params: &[(&str, String)],
    ) -> GarminResult<Value> {
        let id = activity_id.to_string();
        let path = match part {
            Some(part) => Endpoint::Activity.with_segments(&[id.as_str(), part]),
            None => Endpoint::Activity.with_segments(&[id.as_str()]),
        };
        self.fetch_json(what, &path, params).await
    }
}

/// Activity page body; `null` counts as an empty page
fn into_page(body: Value) -> GarminResult<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        _ => Err(GarminError::unexpected_shape("activity page is not an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_page_is_empty() {
        assert!(into_page(Value::Null).unwrap().is_empty());
        assert_eq!(into_page(json!([1, 2])).unwrap().len(), 2);
    }

    #[test]
    fn test_object_page_is_unexpected_shape() {
        assert!(matches!(
            into_page(json!({"error": "nope"})),
            Err(GarminError::UnexpectedShape { .. })
        ));
    }
}
