//! Mock authentication provider for testing.

use crate::error::RemoteError;
use crate::providers::{AuthProvider, SignUpOutcome};
use crate::session::SessionUser;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct AuthState {
    account: SessionUser,
    password: String,
    signed_in: bool,
    sign_out_failure: Option<RemoteError>,
    sign_out_calls: usize,
    auto_confirm: bool,
    sign_ups: Vec<String>,
    password_resets: Vec<String>,
}

/// Mock auth provider with a single account.
#[derive(Debug, Clone)]
pub struct MockAuthProvider {
    state: Arc<Mutex<AuthState>>,
}

impl MockAuthProvider {
    /// Account `user` with `password`, not yet signed in.
    #[must_use]
    pub fn new(user: SessionUser, password: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(AuthState {
                account: user,
                password: password.to_string(),
                signed_in: false,
                sign_out_failure: None,
                sign_out_calls: 0,
                auto_confirm: false,
                sign_ups: Vec::new(),
                password_resets: Vec::new(),
            })),
        }
    }

    /// Account `user`, already signed in.
    #[must_use]
    pub fn signed_in(user: SessionUser) -> Self {
        let provider = Self::new(user, "");
        provider.with_state(|state| state.signed_in = true);
        provider
    }

    /// Confirm new accounts immediately: `sign_up` opens a session for the
    /// new account, which replaces the existing one.
    #[must_use]
    pub fn auto_confirm(self) -> Self {
        self.with_state(|state| state.auto_confirm = true);
        self
    }

    /// Emails registered through `sign_up`, oldest first.
    #[must_use]
    pub fn sign_ups(&self) -> Vec<String> {
        self.with_state(|state| state.sign_ups.clone())
    }

    /// Emails a reset link was requested for, oldest first.
    #[must_use]
    pub fn password_resets(&self) -> Vec<String> {
        self.with_state(|state| state.password_resets.clone())
    }

    /// Make `sign_out` fail with `message`.
    pub fn fail_sign_out(&self, message: &str) {
        self.with_state(|state| state.sign_out_failure = Some(RemoteError::new(message)));
    }

    /// Number of `sign_out` calls.
    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        self.with_state(|state| state.sign_out_calls)
    }

    /// Returns `true` while a session is open.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.with_state(|state| state.signed_in)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut AuthState) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }
}

impl AuthProvider for MockAuthProvider {
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SessionUser, RemoteError>> + Send {
        let provider = self.clone();
        let email = email.to_string();
        let password = password.to_string();

        async move {
            provider.with_state(|state| {
                let email_matches = state.account.email.as_deref() == Some(email.as_str());
                if !email_matches || state.password != password {
                    return Err(RemoteError::new("Invalid login credentials"));
                }
                state.signed_in = true;
                Ok(state.account.clone())
            })
        }
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SignUpOutcome, RemoteError>> + Send {
        let provider = self.clone();
        let email = email.trim().to_string();
        let password = password.to_string();

        async move {
            provider.with_state(|state| {
                let taken = state.account.email.as_deref() == Some(email.as_str())
                    || state.sign_ups.contains(&email);
                if taken {
                    return Err(RemoteError::new("User already registered"));
                }
                if password.len() < 6 {
                    return Err(RemoteError::new(
                        "Password should be at least 6 characters.",
                    ));
                }

                state.sign_ups.push(email.clone());
                if !state.auto_confirm {
                    return Ok(SignUpOutcome::ConfirmationRequired);
                }

                let user = SessionUser::new(format!("user-{}", state.sign_ups.len()), Some(email));
                state.account = user.clone();
                state.password = password;
                state.signed_in = true;
                Ok(SignUpOutcome::SignedIn(user))
            })
        }
    }

    fn reset_password(&self, email: &str) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let provider = self.clone();
        let email = email.trim().to_string();

        async move {
            provider.with_state(|state| state.password_resets.push(email));
            Ok(())
        }
    }

    fn current_user(
        &self,
    ) -> impl Future<Output = Result<Option<SessionUser>, RemoteError>> + Send {
        let provider = self.clone();

        async move {
            Ok(provider.with_state(|state| state.signed_in.then(|| state.account.clone())))
        }
    }

    fn sign_out(&self) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let provider = self.clone();

        async move {
            provider.with_state(|state| {
                state.sign_out_calls += 1;
                if let Some(error) = state.sign_out_failure.clone() {
                    return Err(error);
                }
                state.signed_in = false;
                Ok(())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser::new("u1", Some("ada@example.com".to_string()))
    }

    #[tokio::test]
    async fn sign_in_checks_credentials() {
        let auth = MockAuthProvider::new(user(), "secret");
        assert_eq!(auth.current_user().await, Ok(None));

        let rejected = auth.sign_in_with_password("ada@example.com", "wrong").await;
        assert_eq!(rejected, Err(RemoteError::new("Invalid login credentials")));

        let signed_in = auth.sign_in_with_password("ada@example.com", "secret").await;
        assert_eq!(signed_in, Ok(user()));
        assert_eq!(auth.current_user().await, Ok(Some(user())));
    }

    #[test]
    fn sign_out_failure_keeps_session() {
        let auth = MockAuthProvider::signed_in(user());
        auth.fail_sign_out("network down");

        assert_eq!(
            tokio_test::block_on(auth.sign_out()),
            Err(RemoteError::new("network down"))
        );
        assert!(auth.is_signed_in());
        assert_eq!(auth.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn sign_up_requires_confirmation_by_default() {
        let auth = MockAuthProvider::new(user(), "secret");

        assert_eq!(
            auth.sign_up("grace@example.com", "hopper1").await,
            Ok(SignUpOutcome::ConfirmationRequired)
        );
        assert!(!auth.is_signed_in());
        assert_eq!(auth.sign_ups(), ["grace@example.com"]);

        assert_eq!(
            auth.sign_up("grace@example.com", "hopper1").await,
            Err(RemoteError::new("User already registered"))
        );
        assert_eq!(
            auth.sign_up("ada@example.com", "hopper1").await,
            Err(RemoteError::new("User already registered"))
        );
    }

    #[tokio::test]
    async fn auto_confirmed_sign_up_opens_a_session() {
        let auth = MockAuthProvider::new(user(), "secret").auto_confirm();

        let outcome = auth.sign_up(" grace@example.com ", "hopper1").await;
        let expected = SessionUser::new("user-1", Some("grace@example.com".to_string()));
        assert_eq!(outcome, Ok(SignUpOutcome::SignedIn(expected.clone())));
        assert_eq!(auth.current_user().await, Ok(Some(expected.clone())));

        assert_eq!(auth.sign_out().await, Ok(()));
        assert_eq!(
            auth.sign_in_with_password("grace@example.com", "hopper1").await,
            Ok(expected)
        );
    }

    #[tokio::test]
    async fn weak_password_is_refused() {
        let auth = MockAuthProvider::new(user(), "secret");

        let outcome = auth.sign_up("grace@example.com", "abc").await;
        assert!(matches!(outcome, Err(error) if error.message.contains("at least 6")));
        assert!(auth.sign_ups().is_empty());
    }

    #[tokio::test]
    async fn reset_password_is_recorded_for_any_email() {
        let auth = MockAuthProvider::new(user(), "secret");

        assert_eq!(auth.reset_password("ada@example.com").await, Ok(()));
        assert_eq!(auth.reset_password("nobody@example.com").await, Ok(()));
        assert_eq!(
            auth.password_resets(),
            ["ada@example.com", "nobody@example.com"]
        );
    }
}
