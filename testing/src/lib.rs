//! # Checklist Testing
//!
//! Testing utilities and helpers for the Checklist reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`drain_effects`], which runs effect descriptions and collects the actions they feed back
//! - Assertion helpers for effects
//! - A fixed clock for deterministic timestamps
//!
//! ## Example
//!
//! ```ignore
//! use checklist_testing::ReducerTest;
//!
//! ReducerTest::new(TodoListReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoListState::default())
//!     .when_action(TodoListAction::Load)
//!     .then_actions(|actions| assert_eq!(actions.len(), 1))
//!     .run_async()
//!     .await;
//! ```

use chrono::{DateTime, Utc};
use checklist_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions, drain_effects};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use checklist_testing::mocks::FixedClock;
    /// use checklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .map(|time| time.with_timezone(&Utc))
                .unwrap_or_default(),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
