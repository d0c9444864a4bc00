//! Authentication provider.

use crate::error::RemoteError;
use crate::session::SessionUser;

/// Result of registering a new account
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The backend confirmed the account immediately and opened a session.
    SignedIn(SessionUser),
    /// The account exists but the emailed confirmation link must be followed
    /// before signing in.
    ConfirmationRequired,
}

/// Hosted authentication service.
///
/// The protocol itself belongs to the backend; this trait only covers the
/// calls the todo list needs.
pub trait AuthProvider: Send + Sync {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<SessionUser, RemoteError>> + Send;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the registration, for example
    /// because the email is taken or the password is too weak.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<SignUpOutcome, RemoteError>> + Send;

    /// Email a password reset link.
    ///
    /// Succeeds whether or not an account exists for `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rate limited.
    fn reset_password(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;

    /// The user of the current session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn current_user(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<SessionUser>, RemoteError>> + Send;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the sign-out.
    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), RemoteError>> + Send;
}
