//! Configuration for the hosted backend.
//!
//! Loaded from environment variables; the binary also reads a `.env` file
//! first.
//!
//! | Variable | Default |
//! |---|---|
//! | `CHECKLIST_BACKEND_URL` | required |
//! | `CHECKLIST_ANON_KEY` | required |
//! | `CHECKLIST_TABLE` | `todos` |
//! | `CHECKLIST_REQUEST_TIMEOUT_SECS` | `30` |
//! | `CHECKLIST_EMAIL` | required to sign in |
//! | `CHECKLIST_PASSWORD` | required to sign in |
//! | `CHECKLIST_ACCESS_TOKEN` | optional, resumes an earlier session |

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Default table holding the todos
pub const DEFAULT_TABLE: &str = "todos";

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Hosted backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Table holding the todos
    pub table: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    /// Settings with the default table and timeout
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            table: DEFAULT_TABLE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Use a different table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using `lookup` to read variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, "CHECKLIST_BACKEND_URL")?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "CHECKLIST_BACKEND_URL",
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }

        let request_timeout_secs = match lookup("CHECKLIST_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "CHECKLIST_REQUEST_TIMEOUT_SECS",
                        reason: format!("'{raw}' is not a positive number of seconds"),
                    });
                },
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: required(&lookup, "CHECKLIST_ANON_KEY")?,
            table: lookup("CHECKLIST_TABLE")
                .filter(|table| !table.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            request_timeout_secs,
        })
    }
}

/// Email and password used to sign in
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using `lookup` to read variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either variable is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            email: required(&lookup, "CHECKLIST_EMAIL")?,
            password: required(&lookup, "CHECKLIST_PASSWORD")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access token printed by `checklist sign-in`, used to resume that session
#[derive(Clone, PartialEq, Eq)]
pub struct SavedSession {
    /// Bearer token issued by the auth service
    pub access_token: String,
}

impl SavedSession {
    /// Load from the process environment
    ///
    /// Returns `None` when `CHECKLIST_ACCESS_TOKEN` is unset or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using `lookup` to read variables
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        required(&lookup, "CHECKLIST_ACCESS_TOKEN")
            .ok()
            .map(|access_token| Self { access_token })
    }
}

impl std::fmt::Debug for SavedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedSession")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}
