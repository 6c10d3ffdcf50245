//! Scripted adapters with canned answers, for tests and dry runs.
//!
//! Each adapter records the calls it receives so callers can assert on
//! which collaborators were consulted.

pub mod api;
pub mod wireframe;

pub use api::ScriptedSignupApi;
pub use wireframe::ScriptedWireframe;
