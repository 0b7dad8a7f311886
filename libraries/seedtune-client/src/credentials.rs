//! Bearer token supply.
//!
//! Both REST clients ask a [`CredentialProvider`] for a token on every
//! request and call [`CredentialProvider::refresh`] once when the server
//! answers 401. Where tokens are persisted is up to the application.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{build_http, map_send_error};
use crate::types::{RefreshRequest, RefreshResponse};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Default access-token lifetime when the server does not report one.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Supplies bearer tokens to the REST clients.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// A currently valid access token, refreshing first if it has expired.
    async fn access_token(&self) -> Result<String>;

    /// Force a refresh and return the new access token.
    async fn refresh(&self) -> Result<String>;
}

/// A fixed token that cannot be refreshed.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn access_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(ClientError::AuthRequired);
        }
        Ok(self.token.clone())
    }

    async fn refresh(&self) -> Result<String> {
        Err(ClientError::TokenRefreshFailed(
            "static credentials cannot be refreshed".into(),
        ))
    }
}

/// Token pair plus owner, as handed over after login.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Streaming-platform user id (sent along with refresh requests)
    pub spotify_id: String,
}

#[derive(Debug)]
struct TokenState {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

/// In-memory tokens refreshed through the backend's `/api/auth/refresh`.
pub struct RefreshingCredentials {
    http: Client,
    base_url: String,
    spotify_id: String,
    lifetime: Duration,
    state: RwLock<TokenState>,
}

impl RefreshingCredentials {
    /// Tokens that were just issued, valid for the default lifetime.
    pub fn new(backend: &ClientConfig, tokens: Tokens) -> Result<Self> {
        let lifetime = Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS);
        Ok(Self {
            http: build_http(backend)?,
            base_url: backend.normalized_url()?,
            spotify_id: tokens.spotify_id,
            lifetime,
            state: RwLock::new(TokenState {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires_at: Utc::now() + lifetime,
            }),
        })
    }

    /// Override when the current access token expires (e.g. restored tokens).
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.state.get_mut().expires_at = expires_at;
        self
    }

    /// When the current access token expires.
    pub async fn expiry(&self) -> DateTime<Utc> {
        self.state.read().await.expires_at
    }

    /// Current refresh token.
    pub async fn refresh_token(&self) -> String {
        self.state.read().await.refresh_token.clone()
    }

    async fn refresh_locked(&self, state: &mut TokenState) -> Result<String> {
        let url = format!("{}/api/auth/refresh", self.base_url);
        debug!(url = %url, "Refreshing access token");

        let request = RefreshRequest {
            refresh_token: state.refresh_token.clone(),
            spotify_id: self.spotify_id.clone(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token refresh rejected");
            return Err(ClientError::TokenRefreshFailed(format!(
                "server answered {status}"
            )));
        }

        let refreshed: RefreshResponse = response.json().await.map_err(|e| {
            ClientError::TokenRefreshFailed(format!("failed to parse refresh response: {e}"))
        })?;

        let lifetime = refreshed
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(Duration::seconds)
            .unwrap_or(self.lifetime);

        state.access_token = refreshed.access_token;
        if let Some(rotated) = refreshed.refresh_token {
            state.refresh_token = rotated;
        }
        state.expires_at = Utc::now() + lifetime;

        info!(expires_at = %state.expires_at, "Access token refreshed");
        Ok(state.access_token.clone())
    }
}

#[async_trait]
impl CredentialProvider for RefreshingCredentials {
    async fn access_token(&self) -> Result<String> {
        {
            let state = self.state.read().await;
            if Utc::now() < state.expires_at {
                return Ok(state.access_token.clone());
            }
        }

        let mut state = self.state.write().await;
        // Another caller may have refreshed while we waited
        if Utc::now() < state.expires_at {
            return Ok(state.access_token.clone());
        }
        self.refresh_locked(&mut state).await
    }

    async fn refresh(&self) -> Result<String> {
        let mut state = self.state.write().await;
        self.refresh_locked(&mut state).await
    }
}
