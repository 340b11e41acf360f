use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Capture settings for a single RTSP stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub name: String,
    pub url: String,
    pub initial_delay_ms: i64,
    pub num_images: i64,
    pub interval_ms: i64,
    pub video_duration_s: i64,
}

/// Position of the stream currently being overwritten by the entry form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub device_id: String,
    pub index: usize,
}

impl EditTarget {
    pub fn new(device_id: impl Into<String>, index: usize) -> Self {
        Self {
            device_id: device_id.into(),
            index,
        }
    }
}

/// The whole editable document.
///
/// Devices keep the order of the source document. A device key is only
/// present while it has at least one stream, and `ignored_plates` never
/// holds the same plate twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "rtsp_streams", default)]
    pub streams_by_device: IndexMap<String, Vec<StreamConfig>>,
    #[serde(rename = "ignored_plates", default)]
    pub ignored_plates: Vec<String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream(&self, device_id: &str, index: usize) -> Option<&StreamConfig> {
        self.streams_by_device
            .get(device_id)
            .and_then(|streams| streams.get(index))
    }

    pub fn stream_count(&self) -> usize {
        self.streams_by_device.values().map(Vec::len).sum()
    }

    pub fn device_count(&self) -> usize {
        self.streams_by_device.len()
    }

    /// Append, overwrite in place, or move a stream to another device.
    ///
    /// Without a target the stream is appended to `device_id`. With a target
    /// on the same device the entry is replaced at its index; on a different
    /// device the old entry is removed and the stream goes to the end of the
    /// new device's list.
    pub fn upsert_stream(
        &mut self,
        device_id: &str,
        target: Option<&EditTarget>,
        stream: StreamConfig,
    ) -> Result<()> {
        match target {
            None => {
                self.push_stream(device_id, stream);
            }
            Some(target) if target.device_id == device_id => {
                let slot = self
                    .streams_by_device
                    .get_mut(device_id)
                    .and_then(|streams| streams.get_mut(target.index))
                    .ok_or_else(|| not_found(target))?;
                *slot = stream;
            }
            Some(target) => {
                self.remove_stream(&target.device_id, target.index)?;
                self.push_stream(device_id, stream);
            }
        }
        Ok(())
    }

    /// Remove a stream, dropping the device key once its list is empty
    pub fn remove_stream(&mut self, device_id: &str, index: usize) -> Result<StreamConfig> {
        let streams = self
            .streams_by_device
            .get_mut(device_id)
            .filter(|streams| index < streams.len())
            .ok_or_else(|| not_found(&EditTarget::new(device_id, index)))?;

        let removed = streams.remove(index);
        if streams.is_empty() {
            self.streams_by_device.shift_remove(device_id);
        }
        Ok(removed)
    }

    pub fn has_plate(&self, plate: &str) -> bool {
        self.ignored_plates.iter().any(|p| p == plate)
    }

    /// Append a plate unless it is already listed (exact match)
    pub fn push_plate(&mut self, plate: impl Into<String>) -> bool {
        let plate = plate.into();
        if self.has_plate(&plate) {
            return false;
        }
        self.ignored_plates.push(plate);
        true
    }

    pub fn remove_plate(&mut self, index: usize) -> Result<String> {
        if index >= self.ignored_plates.len() {
            return Err(AppError::PlateNotFound(index));
        }
        Ok(self.ignored_plates.remove(index))
    }

    fn push_stream(&mut self, device_id: &str, stream: StreamConfig) {
        self.streams_by_device
            .entry(device_id.to_string())
            .or_default()
            .push(stream);
    }
}

fn not_found(target: &EditTarget) -> AppError {
    AppError::EntryNotFound {
        device_id: target.device_id.clone(),
        index: target.index,
    }
}
