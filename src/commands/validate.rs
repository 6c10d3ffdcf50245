//! `signup validate` command.

use futures::StreamExt;

use crate::adapters::validation::SERVER_ERROR_MESSAGE;
use crate::context::ServiceContext;
use crate::ports::ValidationService;
use crate::validation::ValidationResult;

use super::{load_config, runtime};

/// Execute the `validate` command.
///
/// Prints one `field: [tone] label` line per field given. The username is
/// checked against the mock backend and its final result is printed.
///
/// # Errors
///
/// Returns an error string if no field was given or configuration is invalid.
pub fn run(
    username: Option<&str>,
    password: Option<&str>,
    repeated: Option<&str>,
) -> Result<(), String> {
    if username.is_none() && password.is_none() && repeated.is_none() {
        return Err("Nothing to validate: pass --username, --password or --repeated".into());
    }
    let config = load_config(None)?;
    let ctx = ServiceContext::mock(&config);
    let validation = ctx.validation.as_ref();

    if let Some(name) = username {
        let result = runtime()?.block_on(final_username_result(validation, name));
        println!("{}", format_line("username", &result));
    }
    if let Some(text) = password {
        println!(
            "{}",
            format_line("password", &validation.validate_password(text))
        );
    }
    if let Some(text) = repeated {
        let result = validation.validate_repeated_password(password.unwrap_or_default(), text);
        println!("{}", format_line("repeated", &result));
    }
    Ok(())
}

/// Runs a username check to completion and returns its last result.
async fn final_username_result(validation: &dyn ValidationService, name: &str) -> ValidationResult {
    validation
        .validate_username(name)
        .fold(ValidationResult::Empty, |_, item| async move {
            item.unwrap_or_else(|_| ValidationResult::failed(SERVER_ERROR_MESSAGE))
        })
        .await
}

fn format_line(field: &str, result: &ValidationResult) -> String {
    format!("{field}: [{}] {result}", result.tone().as_str())
}
