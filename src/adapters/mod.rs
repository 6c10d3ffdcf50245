//! Adapters implementing the port traits.
//!
//! - `mock`: in-process backend and console prompts for the demo binary
//! - `scripted`: canned answers with call recording, for tests
//! - `validation`: the form's validation rules

pub mod mock;
pub mod scripted;
pub mod validation;
