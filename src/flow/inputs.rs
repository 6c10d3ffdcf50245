//! The four input streams a signup form feeds into the flow.

use futures::channel::mpsc;
use futures::stream::{BoxStream, Stream, StreamExt};
use tracing::debug;

/// Raw UI events: the text of each field on every change, and button taps.
pub struct SignupInputs {
    /// Username field text.
    pub username: BoxStream<'static, String>,
    /// Password field text.
    pub password: BoxStream<'static, String>,
    /// Repeated password field text.
    pub repeated_password: BoxStream<'static, String>,
    /// Signup button taps.
    pub submit_taps: BoxStream<'static, ()>,
}

impl SignupInputs {
    /// Wraps arbitrary streams as flow inputs.
    pub fn new<U, P, R, T>(username: U, password: P, repeated_password: R, submit_taps: T) -> Self
    where
        U: Stream<Item = String> + Send + 'static,
        P: Stream<Item = String> + Send + 'static,
        R: Stream<Item = String> + Send + 'static,
        T: Stream<Item = ()> + Send + 'static,
    {
        Self {
            username: username.boxed(),
            password: password.boxed(),
            repeated_password: repeated_password.boxed(),
            submit_taps: submit_taps.boxed(),
        }
    }

    /// Inputs driven by a [`FormController`], for UI glue that pushes events.
    #[must_use]
    pub fn channel() -> (FormController, Self) {
        let (username_tx, username_rx) = mpsc::unbounded();
        let (password_tx, password_rx) = mpsc::unbounded();
        let (repeated_tx, repeated_rx) = mpsc::unbounded();
        let (taps_tx, taps_rx) = mpsc::unbounded();
        let controller = FormController {
            username: username_tx,
            password: password_tx,
            repeated_password: repeated_tx,
            submit_taps: taps_tx,
        };
        (controller, Self::new(username_rx, password_rx, repeated_rx, taps_rx))
    }
}

/// Push side of [`SignupInputs::channel`].
///
/// Events sent after the flow is gone are dropped. Dropping the controller
/// ends all four input streams.
#[derive(Clone)]
pub struct FormController {
    username: mpsc::UnboundedSender<String>,
    password: mpsc::UnboundedSender<String>,
    repeated_password: mpsc::UnboundedSender<String>,
    submit_taps: mpsc::UnboundedSender<()>,
}

impl FormController {
    /// The username field now reads `text`.
    pub fn set_username(&self, text: impl Into<String>) {
        send(&self.username, "username", text.into());
    }

    /// The password field now reads `text`.
    pub fn set_password(&self, text: impl Into<String>) {
        send(&self.password, "password", text.into());
    }

    /// The repeated password field now reads `text`.
    pub fn set_repeated_password(&self, text: impl Into<String>) {
        send(&self.repeated_password, "repeated_password", text.into());
    }

    /// The signup button was tapped.
    pub fn tap_submit(&self) {
        send(&self.submit_taps, "submit_taps", ());
    }
}

fn send<T>(tx: &mpsc::UnboundedSender<T>, field: &'static str, value: T) {
    if tx.unbounded_send(value).is_err() {
        debug!(field, "form event dropped, flow is gone");
    }
}
