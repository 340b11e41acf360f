use crate::config::{EditTarget, StreamConfig};
use crate::error::{AppError, Result};

/// Input fields of the stream entry form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DeviceId,
    Name,
    Url,
    InitialDelayMs,
    NumImages,
    IntervalMs,
    VideoDurationS,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::DeviceId,
        FormField::Name,
        FormField::Url,
        FormField::InitialDelayMs,
        FormField::NumImages,
        FormField::IntervalMs,
        FormField::VideoDurationS,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::DeviceId => "Device ID",
            FormField::Name => "Name",
            FormField::Url => "URL",
            FormField::InitialDelayMs => "Initial Delay (ms)",
            FormField::NumImages => "Num Images",
            FormField::IntervalMs => "Interval (ms)",
            FormField::VideoDurationS => "Video Duration (s)",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Whether submitting appends or overwrites
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(EditTarget),
}

/// Raw text held by the entry form while it is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamForm {
    pub mode: FormMode,
    pub device_id: String,
    pub name: String,
    pub url: String,
    pub initial_delay_ms: String,
    pub num_images: String,
    pub interval_ms: String,
    pub video_duration_s: String,
}

impl StreamForm {
    pub fn blank() -> Self {
        Self {
            mode: FormMode::Add,
            device_id: String::new(),
            name: String::new(),
            url: String::new(),
            initial_delay_ms: String::new(),
            num_images: String::new(),
            interval_ms: String::new(),
            video_duration_s: String::new(),
        }
    }

    pub fn for_entry(target: EditTarget, stream: &StreamConfig) -> Self {
        Self {
            device_id: target.device_id.clone(),
            mode: FormMode::Edit(target),
            name: stream.name.clone(),
            url: stream.url.clone(),
            initial_delay_ms: stream.initial_delay_ms.to_string(),
            num_images: stream.num_images.to_string(),
            interval_ms: stream.interval_ms.to_string(),
            video_duration_s: stream.video_duration_s.to_string(),
        }
    }

    pub fn edit_target(&self) -> Option<&EditTarget> {
        match &self.mode {
            FormMode::Add => None,
            FormMode::Edit(target) => Some(target),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::DeviceId => &self.device_id,
            FormField::Name => &self.name,
            FormField::Url => &self.url,
            FormField::InitialDelayMs => &self.initial_delay_ms,
            FormField::NumImages => &self.num_images,
            FormField::IntervalMs => &self.interval_ms,
            FormField::VideoDurationS => &self.video_duration_s,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::DeviceId => &mut self.device_id,
            FormField::Name => &mut self.name,
            FormField::Url => &mut self.url,
            FormField::InitialDelayMs => &mut self.initial_delay_ms,
            FormField::NumImages => &mut self.num_images,
            FormField::IntervalMs => &mut self.interval_ms,
            FormField::VideoDurationS => &mut self.video_duration_s,
        }
    }

    /// Parse the form into a trimmed device id and a stream.
    ///
    /// An empty device id is accepted as-is.
    pub fn parse(&self) -> Result<(String, StreamConfig)> {
        let stream = StreamConfig {
            name: self.required_text(FormField::Name)?,
            url: self.required_text(FormField::Url)?,
            initial_delay_ms: self.integer(FormField::InitialDelayMs)?,
            num_images: self.integer(FormField::NumImages)?,
            interval_ms: self.integer(FormField::IntervalMs)?,
            video_duration_s: self.integer(FormField::VideoDurationS)?,
        };
        Ok((self.device_id.trim().to_string(), stream))
    }

    fn required_text(&self, field: FormField) -> Result<String> {
        let value = self.value(field).trim();
        if value.is_empty() {
            return Err(AppError::MissingField {
                label: field.label(),
            });
        }
        Ok(value.to_string())
    }

    fn integer(&self, field: FormField) -> Result<i64> {
        let raw = self.required_text(field)?;
        raw.parse().map_err(|_| AppError::InvalidField {
            label: field.label(),
            value: raw,
        })
    }
}

impl Default for StreamForm {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> StreamForm {
        StreamForm {
            device_id: "  cam1 ".to_string(),
            name: "front".to_string(),
            url: " rtsp://x ".to_string(),
            initial_delay_ms: "1000".to_string(),
            num_images: "5".to_string(),
            interval_ms: " 200".to_string(),
            video_duration_s: "10".to_string(),
            ..StreamForm::blank()
        }
    }

    #[test]
    fn test_parse_trims_values() {
        let (device_id, stream) = filled().parse().unwrap();
        assert_eq!(device_id, "cam1");
        assert_eq!(stream.url, "rtsp://x");
        assert_eq!(stream.interval_ms, 200);
        assert_eq!(stream.video_duration_s, 10);
    }

    #[test]
    fn test_parse_allows_empty_device_id() {
        let form = StreamForm {
            device_id: "   ".to_string(),
            ..filled()
        };
        let (device_id, _) = form.parse().unwrap();
        assert_eq!(device_id, "");
    }

    #[test]
    fn test_parse_rejects_empty_text() {
        let form = StreamForm {
            url: "  ".to_string(),
            ..filled()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.to_string(), "URL is required");
    }

    #[test]
    fn test_parse_rejects_non_integer() {
        let form = StreamForm {
            num_images: "5x".to_string(),
            ..filled()
        };
        let err = form.parse().unwrap_err();
        assert_eq!(err.to_string(), "Invalid Num Images: '5x'");
    }

    #[test]
    fn test_for_entry_round_trips_values() {
        let (_, stream) = filled().parse().unwrap();
        let form = StreamForm::for_entry(EditTarget::new("cam1", 2), &stream);

        assert_eq!(form.edit_target(), Some(&EditTarget::new("cam1", 2)));
        assert_eq!(form.value(FormField::DeviceId), "cam1");
        assert_eq!(form.value(FormField::InitialDelayMs), "1000");
        assert_eq!(form.parse().unwrap().1, stream);
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(FormField::DeviceId.next(), FormField::Name);
        assert_eq!(FormField::VideoDurationS.next(), FormField::DeviceId);
        assert_eq!(FormField::DeviceId.prev(), FormField::VideoDurationS);
    }
}
