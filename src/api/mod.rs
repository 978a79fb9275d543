// ABOUTME: Typed Garmin Connect data accessors grouped by domain
// ABOUTME: Each submodule adds methods to the GarminConnect facade
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod achievements;
mod activities;
mod devices;
mod wellness;
