use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server answered with `status: "error"`
    #[error("{0}")]
    Api(String),

    #[error("response did not include a configuration")]
    MissingConfig,

    #[error("Invalid {label}: '{value}'")]
    InvalidField { label: &'static str, value: String },

    #[error("{label} is required")]
    MissingField { label: &'static str },

    #[error("No stream at index {index} for device '{device_id}'")]
    EntryNotFound { device_id: String, index: usize },

    #[error("No ignored plate at index {0}")]
    PlateNotFound(usize),
}

impl AppError {
    /// Application-level failures reported by the server itself
    pub fn is_api(&self) -> bool {
        matches!(self, AppError::Api(_) | AppError::MissingConfig)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
