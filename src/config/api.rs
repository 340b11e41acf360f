use log::debug;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use super::types::Configuration;
use crate::error::{AppError, Result};

pub const CONFIG_PATH: &str = "/api/config";

/// Envelope shared by the read and write endpoints
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    Success {
        #[serde(default)]
        config: Option<Configuration>,
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        #[serde(default)]
        error: Option<String>,
    },
}

const UNKNOWN_ERROR: &str = "unknown error";

fn api_error(error: Option<String>) -> AppError {
    AppError::Api(error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
}

/// Remote storage for the configuration document
pub trait ConfigApi {
    /// Read the current document
    fn fetch(&self) -> Result<Configuration>;

    /// Replace the stored document, returning the server's message if any
    fn store(&self, config: &Configuration) -> Result<Option<String>>;
}

/// `ConfigApi` over HTTP, talking to `{base}/api/config`
pub struct HttpConfigApi {
    client: Client,
    endpoint: String,
}

impl HttpConfigApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(None).build()?;
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), CONFIG_PATH);
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ConfigApi for HttpConfigApi {
    fn fetch(&self) -> Result<Configuration> {
        debug!("GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send()?;

        match decode(response)? {
            ApiResponse::Success {
                config: Some(config),
                ..
            } => Ok(config),
            ApiResponse::Success { config: None, .. } => Err(AppError::MissingConfig),
            ApiResponse::Error { error } => Err(api_error(error)),
        }
    }

    fn store(&self, config: &Configuration) -> Result<Option<String>> {
        debug!(
            "POST {} ({} streams, {} plates)",
            self.endpoint,
            config.stream_count(),
            config.ignored_plates.len()
        );
        let response = self.client.post(&self.endpoint).json(config).send()?;

        match decode(response)? {
            ApiResponse::Success { message, .. } => Ok(message),
            ApiResponse::Error { error } => Err(api_error(error)),
        }
    }
}

/// Decode the envelope regardless of HTTP status; error replies carry it too
fn decode(response: Response) -> Result<ApiResponse> {
    let status = response.status();
    let body = response.text()?;
    debug!("Response {} ({} bytes)", status, body.len());
    Ok(serde_json::from_str(&body)?)
}
