//! REST adapter for a hosted Postgres backend (PostgREST data API and
//! GoTrue auth API, as exposed by Supabase).

use crate::config::BackendConfig;
use crate::error::RemoteError;
use crate::providers::{AuthProvider, RemoteStore, SignUpOutcome};
use crate::session::SessionUser;
use crate::types::{NewTodo, Todo, TodoId, TodoPatch, UserId};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Backend client implementing both [`RemoteStore`] and [`AuthProvider`].
///
/// Every request carries the project's anon key in the `apikey` header and
/// a bearer token: the signed-in user's access token once available,
/// otherwise the anon key.
///
/// Cloning shares the HTTP connection pool and the access token.
#[derive(Clone, Debug)]
pub struct RestBackend {
    http_client: Client,
    config: Arc<BackendConfig>,
    access_token: Arc<RwLock<Option<String>>>,
}

/// GoTrue user object
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

/// GoTrue password grant response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserResponse,
}

/// GoTrue sign-up response: a session when the project auto-confirms new
/// accounts, otherwise the unconfirmed user
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    Unconfirmed(UserResponse),
}

/// Error bodies returned by PostgREST (`message`) and GoTrue (`msg`,
/// `error_description`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl RestBackend {
    /// Create a backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, RemoteError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config: Arc::new(config),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Resume a session from a previously issued access token
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(token.into());
    }

    /// Access token of the open session, if any
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// The connection settings
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url(), self.config.table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url())
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.read().await.clone();
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token.as_deref().unwrap_or(&self.config.anon_key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = error_from_body(status, &body);
        tracing::warn!(%status, error = %error, "Backend request failed");
        Err(error)
    }
}

impl RemoteStore for RestBackend {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Todo>, RemoteError> {
        let owner_filter = format!("eq.{owner}");
        let request = self.http_client.get(self.table_url()).query(&[
            ("select", "*"),
            ("user_id", owner_filter.as_str()),
            ("order", "created_at.desc"),
        ]);

        let todos: Vec<Todo> = self.send(request).await?.json().await?;
        tracing::debug!(count = todos.len(), "Fetched todos");
        Ok(todos)
    }

    async fn insert(&self, todo: &NewTodo) -> Result<Todo, RemoteError> {
        let request = self
            .http_client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(todo);

        let rows: Vec<Todo> = self.send(request).await?.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::new("Insert returned no record"))
    }

    async fn update_by_id(&self, id: &TodoId, patch: &TodoPatch) -> Result<(), RemoteError> {
        let id_filter = format!("eq.{id}");
        let request = self
            .http_client
            .patch(self.table_url())
            .query(&[("id", id_filter.as_str())])
            .json(patch);

        self.send(request).await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), RemoteError> {
        let id_filter = format!("eq.{id}");
        let request = self
            .http_client
            .delete(self.table_url())
            .query(&[("id", id_filter.as_str())]);

        self.send(request).await?;
        Ok(())
    }
}

impl AuthProvider for RestBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, RemoteError> {
        let request = self
            .http_client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));

        let token: TokenResponse = self.send(request).await?.json().await?;
        *self.access_token.write().await = Some(token.access_token);

        Ok(SessionUser::new(token.user.id, token.user.email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, RemoteError> {
        let request = self
            .http_client
            .post(self.auth_url("signup"))
            .json(&serde_json::json!({ "email": email.trim(), "password": password }));

        let response: SignUpResponse = self.send(request).await?.json().await?;
        match response {
            SignUpResponse::Session(token) => {
                *self.access_token.write().await = Some(token.access_token);
                Ok(SignUpOutcome::SignedIn(SessionUser::new(
                    token.user.id,
                    token.user.email,
                )))
            },
            SignUpResponse::Unconfirmed(user) => {
                tracing::info!(id = %user.id, "Account awaits email confirmation");
                Ok(SignUpOutcome::ConfirmationRequired)
            },
        }
    }

    async fn reset_password(&self, email: &str) -> Result<(), RemoteError> {
        let request = self
            .http_client
            .post(self.auth_url("recover"))
            .json(&serde_json::json!({ "email": email.trim() }));

        self.send(request).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<SessionUser>, RemoteError> {
        if self.access_token.read().await.is_none() {
            return Ok(None);
        }

        let request = self.http_client.get(self.auth_url("user"));
        let response = self.authorize(request).await.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Saved access token is no longer valid");
            *self.access_token.write().await = None;
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let user: UserResponse = response.json().await?;
        Ok(Some(SessionUser::new(user.id, user.email)))
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        if self.access_token.read().await.is_none() {
            return Ok(());
        }

        let request = self.http_client.post(self.auth_url("logout"));
        self.send(request).await?;
        *self.access_token.write().await = None;
        Ok(())
    }
}

/// Human-readable error from a failed response body
fn error_from_body(status: StatusCode, body: &str) -> RemoteError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty());

    match message {
        Some(message) => RemoteError::new(message),
        None if !body.trim().is_empty() && !body.trim_start().starts_with('{') => {
            RemoteError::new(body.trim())
        },
        None => RemoteError::new(format!("Request failed with status {status}")),
    }
}
