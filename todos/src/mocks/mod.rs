//! Mock provider implementations for testing.
//!
//! In-memory, deterministic implementations of every provider trait, with
//! failure injection and call counters.

pub mod auth;
pub mod notifier;
pub mod remote_store;

pub use auth::MockAuthProvider;
pub use notifier::RecordingNotifier;
pub use remote_store::MockRemoteStore;
