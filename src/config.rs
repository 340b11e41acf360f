pub mod api;
pub mod types;

pub use api::{ConfigApi, HttpConfigApi};
pub use types::{Configuration, EditTarget, StreamConfig};
