// ABOUTME: Achievement accessors - personal records, badges, and challenges
// ABOUTME: Paged challenge listings take a caller supplied start offset and limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::client::GarminConnect;
use crate::constants::Endpoint;
use crate::errors::GarminResult;
use serde_json::Value;

impl GarminConnect {
    /// Personal records of the logged-in user
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_personal_record(&self) -> GarminResult<Value> {
        let path = self.user_path(Endpoint::PersonalRecords)?;
        self.fetch_json("personal records", &path, &[]).await
    }

    /// Badges earned so far
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_earned_badges(&self) -> GarminResult<Value> {
        self.fetch_json("earned badges", Endpoint::EarnedBadges.path(), &[])
            .await
    }

    /// Historical ad-hoc challenges
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_adhoc_challenges(&self, start: u32, limit: u32) -> GarminResult<Value> {
        self.challenges("adhoc challenges", Endpoint::AdhocChallenges, start, limit)
            .await
    }

    /// Completed badge challenges
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_badge_challenges(&self, start: u32, limit: u32) -> GarminResult<Value> {
        self.challenges("badge challenges", Endpoint::BadgeChallenges, start, limit)
            .await
    }

    /// Badge challenges open to join
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_available_badge_challenges(
        &self,
        start: u32,
        limit: u32,
    ) -> GarminResult<Value> {
        self.challenges(
            "available badge challenges",
            Endpoint::AvailableBadgeChallenges,
            start,
            limit,
        )
        .await
    }

    /// Joined badge challenges not yet completed
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_non_completed_badge_challenges(
        &self,
        start: u32,
        limit: u32,
    ) -> GarminResult<Value> {
        self.challenges(
            "non-completed badge challenges",
            Endpoint::NonCompletedBadgeChallenges,
            start,
            limit,
        )
        .await
    }

    async fn challenges(
        &self,
        what: &str,
        endpoint: Endpoint,
        start: u32,
        limit: u32,
    ) -> GarminResult<Value> {
        self.fetch_json(
            what,
            endpoint.path(),
            &[("start", start.to_string()), ("limit", limit.to_string())],
        )
        .await
    }
}
