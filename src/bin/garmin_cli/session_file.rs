// ABOUTME: On-disk session storage for garmin-cli
// ABOUTME: Reads and writes the exported session blob under the user config directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Result};
use pierre_garmin_connect::Session;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// `<config dir>/garmin-connect/session.json`
pub fn default_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no config directory for this platform")?;
    Ok(base.join("garmin-connect").join("session.json"))
}

/// Saved session, `None` when the file is absent or unreadable as a session
pub async fn load(path: &Path) -> Result<Option<Session>> {
    let blob = match fs::read_to_string(path).await {
        Ok(blob) => blob,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("reading {}", path.display()));
        }
    };

    match Session::from_json(&blob) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            Ok(None)
        }
    }
}

/// Write the session blob, creating the parent directory
pub async fn save(path: &Path, blob: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, blob)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    restrict_permissions(path).await?;
    debug!(path = %path.display(), "Saved session");
    Ok(())
}

/// Delete the session file; a missing file is not an error
pub async fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .with_context(|| format!("setting permissions on {}", path.display()))
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
