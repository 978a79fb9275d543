// ABOUTME: garmin-cli - command-line access to a Garmin Connect account
// ABOUTME: Logs in or resumes a saved session, then prints the requested data as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Log in and save the session for later runs
//! GARMIN_USERNAME=runner@example.com GARMIN_PASSWORD=secret garmin-cli login
//!
//! # Daily summary
//! garmin-cli summary 2024-05-01
//!
//! # Every run in April
//! garmin-cli activities --start 2024-04-01 --end 2024-04-30 --type running
//!
//! # Export an activity as GPX
//! garmin-cli download 123456789 --format gpx --output run.gpx
//!
//! # Forget the saved session
//! garmin-cli logout
//! ```

mod commands;
mod session_file;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pierre_garmin_connect::logging::LoggingConfig;
use pierre_garmin_connect::{ActivityDownloadFormat, ConnectConfig, Credentials, Region};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "garmin-cli",
    about = "Garmin Connect command-line client",
    long_about = "Log in to Garmin Connect, keep the session on disk, and print wellness, activity, and device data as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Account email
    #[arg(long, env = "GARMIN_USERNAME", global = true)]
    username: Option<String>,

    /// Account password
    #[arg(long, env = "GARMIN_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Endpoint region (global, china); defaults to `GARMIN_REGION` or global
    #[arg(long, global = true)]
    region: Option<Region>,

    /// Session file override
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Authenticate (or resume) and save the session
    Login,

    /// Daily summary for a date
    Summary {
        /// Day as YYYY-MM-DD
        date: NaiveDate,
    },

    /// Activities between two dates
    Activities {
        /// First day (inclusive)
        #[arg(long)]
        start: NaiveDate,

        /// Last day (inclusive)
        #[arg(long)]
        end: NaiveDate,

        /// Activity type key, e.g. running
        #[arg(long = "type")]
        activity_type: Option<String>,
    },

    /// Download an activity export
    Download {
        /// Activity id
        id: u64,

        /// Export format (original, tcx, gpx, kml, csv)
        #[arg(long, default_value_t = ActivityDownloadFormat::default())]
        format: ActivityDownloadFormat,

        /// Output path, defaults to `<id>.<extension>`
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Registered devices
    Devices,

    /// Alarms across every device
    Alarms,

    /// Log out and delete the saved session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let session_path = match cli.session_file {
        Some(path) => path,
        None => session_file::default_path()?,
    };
    debug!(path = %session_path.display(), "Using session file");

    let config = connect_config(cli.region)?;
    let credentials = match (cli.username, cli.password) {
        (Some(username), Some(password)) => Some(Credentials::new(username, password)),
        _ => None,
    };

    let context = commands::RunContext {
        credentials,
        config,
        session_path,
    };

    match cli.command {
        Command::Login => commands::login(&context).await,
        Command::Summary { date } => commands::summary(&context, date).await,
        Command::Activities {
            start,
            end,
            activity_type,
        } => commands::activities(&context, start, end, activity_type.as_deref()).await,
        Command::Download { id, format, output } => {
            commands::download(&context, id, format, output).await
        }
        Command::Devices => commands::devices(&context).await,
        Command::Alarms => commands::alarms(&context).await,
        Command::Logout => commands::logout(&context).await,
    }
}

/// Environment configuration with an optional region override from the command line
fn connect_config(region: Option<Region>) -> Result<ConnectConfig> {
    let from_env = ConnectConfig::from_env().context("invalid GARMIN_* environment")?;
    Ok(match region {
        Some(region) if region != from_env.region => ConnectConfig {
            user_agent: from_env.user_agent,
            timeout: from_env.timeout,
            connect_timeout: from_env.connect_timeout,
            ..ConnectConfig::for_region(region)
        },
        _ => from_env,
    })
}
