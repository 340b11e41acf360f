pub mod model;
pub mod text;

pub use model::{STREAM_COLUMNS, StreamRow, ViewModel, render};
pub use text::format_view;
