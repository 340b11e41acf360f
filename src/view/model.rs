use crate::config::Configuration;

/// Column headings of the streams table
pub const STREAM_COLUMNS: [&str; 7] = [
    "Device ID",
    "Name",
    "URL",
    "Initial Delay (ms)",
    "Num Images",
    "Interval (ms)",
    "Video Duration (s)",
];

/// One row of the streams table, bound to its (device, index) position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRow {
    pub device_id: String,
    pub index: usize,
    pub name: String,
    pub url: String,
    pub initial_delay_ms: i64,
    pub num_images: i64,
    pub interval_ms: i64,
    pub video_duration_s: i64,
}

impl StreamRow {
    /// Cell text in `STREAM_COLUMNS` order
    pub fn cells(&self) -> [String; 7] {
        [
            self.device_id.clone(),
            self.name.clone(),
            self.url.clone(),
            self.initial_delay_ms.to_string(),
            self.num_images.to_string(),
            self.interval_ms.to_string(),
            self.video_duration_s.to_string(),
        ]
    }
}

/// One ignored plate, bound to its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateRow {
    pub index: usize,
    pub plate: String,
}

/// Everything a presenter needs to draw the editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    pub streams: Vec<StreamRow>,
    pub plates: Vec<PlateRow>,
}

/// Streams in document device order, then list order
pub fn render_streams(config: &Configuration) -> Vec<StreamRow> {
    config
        .streams_by_device
        .iter()
        .flat_map(|(device_id, streams)| {
            streams.iter().enumerate().map(move |(index, stream)| StreamRow {
                device_id: device_id.clone(),
                index,
                name: stream.name.clone(),
                url: stream.url.clone(),
                initial_delay_ms: stream.initial_delay_ms,
                num_images: stream.num_images,
                interval_ms: stream.interval_ms,
                video_duration_s: stream.video_duration_s,
            })
        })
        .collect()
}

pub fn render_plates(config: &Configuration) -> Vec<PlateRow> {
    config
        .ignored_plates
        .iter()
        .enumerate()
        .map(|(index, plate)| PlateRow {
            index,
            plate: plate.clone(),
        })
        .collect()
}

pub fn render(config: &Configuration) -> ViewModel {
    ViewModel {
        streams: render_streams(config),
        plates: render_plates(config),
    }
}
