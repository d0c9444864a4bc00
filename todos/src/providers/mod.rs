//! Providers for the todo list's external dependencies.
//!
//! The reducer only depends on these traits. The binary wires in
//! [`RestBackend`] and a [`ChannelNotifier`]; tests use the in-memory
//! implementations from `crate::mocks`.
//!
//! Every remote call is fallible and reports failures as a
//! [`RemoteError`](crate::error::RemoteError) carrying a human-readable message.

pub mod auth;
pub mod notifier;
pub mod remote_store;
pub mod rest;

pub use auth::{AuthProvider, SignUpOutcome};
pub use notifier::{ChannelNotifier, Notifier, TracingNotifier};
pub use remote_store::RemoteStore;
pub use rest::RestBackend;
