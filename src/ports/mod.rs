//! Port traits defining external boundaries.
//!
//! Each trait is a collaborator the signup flow talks to: the remote API,
//! the validation rules and the UI's prompt presenter. Implementations live
//! in `src/adapters/`.

pub mod api;
pub mod validation;
pub mod wireframe;

pub use api::{ApiFuture, SignupApi};
pub use validation::{UsernameValidation, ValidationService};
pub use wireframe::{PromptFuture, Wireframe};
