//! Dependencies injected into the todo list reducer.

use crate::providers::{AuthProvider, Notifier, RemoteStore};
use crate::session::SessionContext;
use std::sync::Arc;

/// Todo list environment.
///
/// # Type Parameters
///
/// - `S`: Remote store
/// - `A`: Auth provider
/// - `N`: Notifier
#[derive(Clone)]
pub struct TodoEnvironment<S, A, N>
where
    S: RemoteStore + Clone,
    A: AuthProvider + Clone,
    N: Notifier + Clone,
{
    /// Remote todo table.
    pub store: S,

    /// Authentication service.
    pub auth: A,

    /// Notification sink.
    pub notifier: N,

    /// The signed-in user's session; every todo belongs to its user.
    pub session: Arc<SessionContext>,
}

impl<S, A, N> TodoEnvironment<S, A, N>
where
    S: RemoteStore + Clone,
    A: AuthProvider + Clone,
    N: Notifier + Clone,
{
    /// Create a new environment.
    #[must_use]
    pub const fn new(store: S, auth: A, notifier: N, session: Arc<SessionContext>) -> Self {
        Self {
            store,
            auth,
            notifier,
            session,
        }
    }
}
