//! Session context and session lifecycle events.
//!
//! A [`SessionContext`] is created when a user signs in and handed to the
//! todo list's environment. Sign-out tears it down. Interested parties
//! (the shell, navigation) learn about sign-in and sign-out through
//! [`SessionEvents`] rather than through the list's operations.

use crate::types::UserId;
use checklist_core::environment::Clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// The authenticated user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Backend user identifier
    pub id: UserId,
    /// Email address, when the backend reports one
    pub email: Option<String>,
}

impl SessionUser {
    /// Create a session user
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: UserId::new(id),
            email,
        }
    }
}

/// Session lifecycle notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session started for this user
    SignedIn(SessionUser),
    /// The session ended
    SignedOut,
}

/// Broadcast channel of [`SessionEvent`]s
#[derive(Clone, Debug)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Create a channel keeping up to `capacity` undelivered events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; having no subscribers is not an error
    pub fn publish(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Session event published with no subscribers");
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}

/// The signed-in user's session
#[derive(Debug)]
pub struct SessionContext {
    user: SessionUser,
    started_at: DateTime<Utc>,
    events: SessionEvents,
    active: AtomicBool,
}

impl SessionContext {
    /// Start a session for `user` and announce it on `events`
    #[must_use]
    pub fn begin(user: SessionUser, events: &SessionEvents, clock: &dyn Clock) -> Arc<Self> {
        tracing::info!(user_id = %user.id, "Session started");
        events.publish(SessionEvent::SignedIn(user.clone()));

        Arc::new(Self {
            user,
            started_at: clock.now(),
            events: events.clone(),
            active: AtomicBool::new(true),
        })
    }

    /// The signed-in user
    #[must_use]
    pub const fn user(&self) -> &SessionUser {
        &self.user
    }

    /// Owner id for every todo in this session
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// When the session started
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns `false` once the session has ended
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// End the session
    ///
    /// Publishes [`SessionEvent::SignedOut`] the first time only.
    pub fn end(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            tracing::info!(user_id = %self.user.id, "Session ended");
            self.events.publish(SessionEvent::SignedOut);
        }
    }
}
