pub mod controller;
pub mod form;
pub mod status;

pub use controller::{ConfigEditor, PlateOutcome};
pub use form::{FormField, FormMode};
pub use status::{StatusKind, StatusMessage};
