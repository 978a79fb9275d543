// ABOUTME: Device accessors - registered devices, per-device settings, alarms, last used
// ABOUTME: Alarm listing fans out over the device list and gathers each device's alarm array
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::client::GarminConnect;
use crate::constants::Endpoint;
use crate::errors::{GarminError, GarminResult};
use serde_json::Value;
use tracing::debug;

impl GarminConnect {
    /// Devices registered to the account
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedShape` if the body is not an array, or any request error
    pub async fn get_devices(&self) -> GarminResult<Vec<Value>> {
        match self
            .fetch_json("devices", Endpoint::Devices.path(), &[])
            .await?
        {
            Value::Array(devices) => Ok(devices),
            Value::Null => Ok(Vec::new()),
            _ => Err(GarminError::unexpected_shape("device list is not an array")),
        }
    }

    /// Settings of one device
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_device_settings(&self, device_id: &str) -> GarminResult<Value> {
        let path = Endpoint::DeviceService.with_segments(&["device-info", "settings", device_id]);
        self.fetch_json("device settings", &path, &[]).await
    }

    /// Alarms of every device, in device list order
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedShape` for a device without a usable `deviceId`, or
    /// the first failing request
    pub async fn get_device_alarms(&self) -> GarminResult<Vec<Value>> {
        let mut alarms = Vec::new();
        for device in self.get_devices().await? {
            let device_id = device_id(&device)
                .ok_or_else(|| GarminError::unexpected_shape("device entry has no deviceId"))?;
            let settings = self.get_device_settings(&device_id).await?;
            match settings.get("alarms") {
                Some(Value::Array(found)) => alarms.extend(found.iter().cloned()),
                _ => debug!(%device_id, "Device has no alarms"),
            }
        }
        Ok(alarms)
    }

    /// Device most recently synced
    ///
    /// # Errors
    ///
    /// Returns any request or decode error
    pub async fn get_device_last_used(&self) -> GarminResult<Value> {
        let path = Endpoint::DeviceService.with_segments(&["mylastused"]);
        self.fetch_json("last used device", &path, &[]).await
    }
}

/// `deviceId` as a path segment; Connect reports it as a number or a string
fn device_id(device: &Value) -> Option<String> {
    match device.get("deviceId")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
