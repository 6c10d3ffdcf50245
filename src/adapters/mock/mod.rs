//! Mock backend used by the demo binary.

pub mod api;
pub mod console;

pub use api::MockSignupApi;
pub use console::ConsoleWireframe;
