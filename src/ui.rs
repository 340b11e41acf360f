pub mod input;
pub mod render;

pub use input::handle_input;
pub use render::render;
