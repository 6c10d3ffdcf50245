//! `signup session` command.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::context::ServiceContext;
use crate::flow::{FormSnapshot, SignupFlow, SignupInputs};
use crate::reactive::{Signal, SignalValue};
use crate::script::{SessionEvent, SessionScript};

use super::{load_config, runtime};

/// One printed line: an output signal took a new value.
#[derive(Debug, Serialize)]
struct SignalChange<'a, T> {
    at: DateTime<Utc>,
    session: &'a str,
    signal: &'static str,
    value: T,
}

/// Final line printed once the session settles.
#[derive(Debug, Serialize)]
struct SessionSummary<'a> {
    at: DateTime<Utc>,
    session: &'a str,
    script: &'a str,
    snapshot: FormSnapshot,
}

/// Execute the `session` command.
///
/// Replays the script against the mock backend, printing each output change
/// as a JSON line and a final snapshot.
///
/// # Errors
///
/// Returns an error string if the script or configuration cannot be loaded.
pub fn run(script_path: &Path, settle: Duration, failure_rate: Option<f64>) -> Result<(), String> {
    let script = SessionScript::load(script_path).map_err(|e| e.to_string())?;
    let config = load_config(failure_rate)?;
    runtime()?.block_on(async {
        let ctx = ServiceContext::mock(&config);
        play(&script, &ctx, settle).await;
    });
    Ok(())
}

/// Feeds `script` into a fresh flow wired against `ctx`, prints every output
/// change, waits `settle` after the last event, then tears the flow down.
/// Returns the state the form settled in.
pub async fn play(script: &SessionScript, ctx: &ServiceContext, settle: Duration) -> FormSnapshot {
    let (form, inputs) = SignupInputs::channel();
    let flow = SignupFlow::new(inputs, ctx);
    let session = flow.session_id().to_owned();

    let printers = vec![
        print_changes("validated_username", flow.validated_username(), &session),
        print_changes("validated_password", flow.validated_password(), &session),
        print_changes(
            "validated_password_repeated",
            flow.validated_password_repeated(),
            &session,
        ),
        print_changes("signup_enabled", flow.signup_enabled(), &session),
        print_changes("signing_in", flow.signing_in(), &session),
        print_changes("signed_in", flow.signed_in(), &session),
    ];

    for event in &script.events {
        match event {
            SessionEvent::Username { text } => form.set_username(text.as_str()),
            SessionEvent::Password { text } => form.set_password(text.as_str()),
            SessionEvent::RepeatedPassword { text } => form.set_repeated_password(text.as_str()),
            SessionEvent::Tap => form.tap_submit(),
            SessionEvent::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
        }
        // Let the graph react before the next keystroke.
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(settle).await;

    let snapshot = flow.snapshot();
    print_json(&SessionSummary {
        at: Utc::now(),
        session: &session,
        script: &script.name,
        snapshot: snapshot.clone(),
    });

    drop(form);
    drop(flow);
    for printer in printers {
        // Printers end on their own once the flow's signals close.
        let _ = printer.await;
    }
    snapshot
}

fn print_changes<T>(name: &'static str, signal: &Signal<T>, session: &str) -> JoinHandle<()>
where
    T: SignalValue + Serialize,
{
    let mut changes = signal.subscribe();
    let session = session.to_owned();
    tokio::spawn(async move {
        while let Some(value) = changes.next().await {
            print_json(&SignalChange {
                at: Utc::now(),
                session: &session,
                signal: name,
                value,
            });
        }
    })
}

fn print_json<T: Serialize>(line: &T) {
    match serde_json::to_string(line) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::warn!(%err, "failed to serialize output line"),
    }
}
