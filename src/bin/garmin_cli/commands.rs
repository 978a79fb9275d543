// ABOUTME: garmin-cli subcommand handlers
// ABOUTME: Each handler opens a client from the saved session, runs one call, and prints JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::session_file;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use pierre_garmin_connect::{
    ActivityDownloadFormat, ConnectConfig, Credentials, GarminConnect, LoginOutcome,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings shared by every subcommand
pub struct RunContext {
    pub credentials: Option<Credentials>,
    pub config: ConnectConfig,
    pub session_path: PathBuf,
}

/// Logged-in client, resuming the saved session when possible
async fn open(ctx: &RunContext) -> Result<GarminConnect> {
    let credentials = ctx
        .credentials
        .clone()
        .context("GARMIN_USERNAME and GARMIN_PASSWORD (or --username/--password) are required")?;
    let saved = session_file::load(&ctx.session_path).await?;

    let mut client = GarminConnect::with_config(credentials, ctx.config.clone(), saved)?;
    match client.login().await? {
        LoginOutcome::Resumed => info!("Resumed saved session"),
        LoginOutcome::Authenticated => info!("Logged in with credentials"),
    }

    persist(&client, &ctx.session_path).await?;
    Ok(client)
}

async fn persist(client: &GarminConnect, path: &Path) -> Result<()> {
    let blob = client.export_session()?;
    session_file::save(path, &blob).await
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn login(ctx: &RunContext) -> Result<()> {
    let client = open(ctx).await?;
    print_json(&json!({
        "displayName": client.display_name()?,
        "fullName": client.full_name(),
        "unitSystem": client.unit_system(),
        "sessionFile": ctx.session_path.display().to_string(),
    }))
}

pub async fn summary(ctx: &RunContext, date: NaiveDate) -> Result<()> {
    let client = open(ctx).await?;
    print_json(&client.get_user_summary(date).await?)
}

pub async fn activities(
    ctx: &RunContext,
    start: NaiveDate,
    end: NaiveDate,
    activity_type: Option<&str>,
) -> Result<()> {
    let client = open(ctx).await?;
    let activities = client
        .get_activities_by_date(start, end, activity_type)
        .await?;
    print_json(&activities)
}

pub async fn download(
    ctx: &RunContext,
    id: u64,
    format: ActivityDownloadFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let client = open(ctx).await?;
    let bytes = client.download_activity(id, format).await?;
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{id}.{}", format.extension())));

    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    print_json(&json!({
        "activityId": id,
        "format": format,
        "bytes": bytes.len(),
        "path": output.display().to_string(),
    }))
}

pub async fn devices(ctx: &RunContext) -> Result<()> {
    let client = open(ctx).await?;
    print_json(&client.get_devices().await?)
}

pub async fn alarms(ctx: &RunContext) -> Result<()> {
    let client = open(ctx).await?;
    print_json(&client.get_device_alarms().await?)
}

/// Log out remotely when a session can be opened, then always drop the file
pub async fn logout(ctx: &RunContext) -> Result<()> {
    if ctx.credentials.is_some() {
        match open(ctx).await {
            Ok(mut client) => {
                if let Err(e) = client.logout().await {
                    warn!(error = %e, "Remote logout failed");
                }
            }
            Err(e) => warn!(error = %e, "Could not open session for logout"),
        }
    }

    session_file::remove(&ctx.session_path).await?;
    print_json(&json!({ "loggedOut": true }))
}
