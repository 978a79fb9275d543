// ABOUTME: Daily wellness accessors - summary, steps, heart rate, sleep, stress, body composition
// ABOUTME: Date-keyed lookups against the Connect user summary, wellness, and weight services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::client::{day, GarminConnect};
use crate::constants::{limits, Endpoint};
use crate::errors::{AuthFailure, GarminError, GarminResult};
use chrono::NaiveDate;
use serde_json::{Map, Value};

impl GarminConnect {
    /// Activity summary for a day
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed(PrivacyProtected)` when the server flags
    /// the summary as privacy protected, otherwise any request error
    pub async fn get_user_summary(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = self.user_path(Endpoint::DailySummary)?;
        let summary = self
            .fetch_json("user summary", &path, &[("calendarDate", day(date))])
            .await?;

        if summary.get("privacyProtected").and_then(Value::as_bool) == Some(true) {
            return Err(AuthFailure::PrivacyProtected.into());
        }
        Ok(summary)
    }

    /// Alias of [`GarminConnect::get_user_summary`]
    ///
    /// # Errors
    ///
    /// Same as [`GarminConnect::get_user_summary`]
    pub async fn get_stats(&self, date: NaiveDate) -> GarminResult<Value> {
        self.get_user_summary(date).await
    }

    /// Step chart for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_steps_data(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = self.user_path(Endpoint::DailySummaryChart)?;
        self.fetch_json("steps data", &path, &[("date", day(date))])
            .await
    }

    /// Heart rate samples for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_heart_rates(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = self.user_path(Endpoint::DailyHeartRate)?;
        self.fetch_json("heart rates", &path, &[("date", day(date))])
            .await
    }

    /// Body composition between two days (inclusive); `end` defaults to `start`
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_body_composition(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> GarminResult<Value> {
        let end = end.unwrap_or(start);
        self.fetch_json(
            "body composition",
            Endpoint::WeightDateRange.path(),
            &[("startDate", day(start)), ("endDate", day(end))],
        )
        .await
    }

    /// Daily summary with the body composition averages merged over it
    ///
    /// Keys from `totalAverage` replace same-named summary keys. A missing or
    /// `null` `totalAverage` leaves the summary unchanged.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedShape` if the summary is not a JSON object, or any
    /// error of the two underlying calls
    pub async fn get_stats_and_body(&self, date: NaiveDate) -> GarminResult<Map<String, Value>> {
        let Value::Object(mut merged) = self.get_stats(date).await? else {
            return Err(GarminError::unexpected_shape("user summary is not an object"));
        };

        let body = self.get_body_composition(date, None).await?;
        if let Some(Value::Object(average)) = body.get("totalAverage") {
            for (key, value) in average {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged)
    }

    /// VO2 max / fitness age metrics for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_max_metrics(&self, date: NaiveDate) -> GarminResult<Value> {
        let date = day(date);
        let path = Endpoint::MaxMetrics.with_segments(&[date.as_str(), date.as_str()]);
        self.fetch_json("max metrics", &path, &[]).await
    }

    /// Hydration log for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_hydration_data(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = Endpoint::DailyHydration.with_segments(&[day(date).as_str()]);
        self.fetch_json("hydration data", &path, &[]).await
    }

    /// Respiration for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_respiration_data(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = Endpoint::DailyRespiration.with_segments(&[day(date).as_str()]);
        self.fetch_json("respiration data", &path, &[]).await
    }

    /// Pulse oximetry for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_spo2_data(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = Endpoint::DailySpo2.with_segments(&[day(date).as_str()]);
        self.fetch_json("SpO2 data", &path, &[]).await
    }

    /// Sleep for the night ending on a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_sleep_data(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = self.user_path(Endpoint::DailySleep)?;
        self.fetch_json(
            "sleep data",
            &path,
            &[
                ("date", day(date)),
                (
                    "nonSleepBufferMinutes",
                    limits::SLEEP_NON_SLEEP_BUFFER_MINUTES.to_string(),
                ),
            ],
        )
        .await
    }

    /// Stress for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_stress_data(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = Endpoint::DailyStress.with_segments(&[day(date).as_str()]);
        self.fetch_json("stress data", &path, &[]).await
    }

    /// Resting heart rate for a day
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_rhr_day(&self, date: NaiveDate) -> GarminResult<Value> {
        let path = self.user_path(Endpoint::RestingHeartRate)?;
        let date = day(date);
        self.fetch_json(
            "resting heartrate data",
            &path,
            &[
                ("fromDate", date.clone()),
                ("untilDate", date),
                (
                    "metricId",
                    limits::RESTING_HEART_RATE_METRIC_ID.to_string(),
                ),
            ],
        )
        .await
    }
}
