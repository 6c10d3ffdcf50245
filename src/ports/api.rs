//! Signup API port: the remote side of the form.

use std::future::Future;
use std::pin::Pin;

use crate::error::TransportError;

/// Boxed future returned by [`SignupApi`] methods, kept `'static` so calls
/// can outlive the borrow of the API handle.
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'static>>;

/// Server operations the signup form depends on.
pub trait SignupApi: Send + Sync {
    /// Resolves to `true` when nobody has registered `username` yet.
    ///
    /// # Errors
    ///
    /// Resolves to a [`TransportError`] when the server cannot be asked.
    fn username_available(&self, username: &str) -> ApiFuture<bool>;

    /// Registers an account. Resolves once, after the server answered,
    /// to whether the signup succeeded.
    ///
    /// # Errors
    ///
    /// Resolves to a [`TransportError`] when the server cannot be asked.
    fn signup(&self, username: &str, password: &str) -> ApiFuture<bool>;
}
