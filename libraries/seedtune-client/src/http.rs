//! Request plumbing shared by the backend and streaming clients.

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{ClientError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

/// Build the reqwest client for one boundary.
pub(crate) fn build_http(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .user_agent(format!("Seedtune/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::Request)
}

/// Classify transport failures.
pub(crate) fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Percent-encode one path segment or query value.
pub(crate) fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Authenticated access to one base URL.
#[derive(Clone)]
pub(crate) struct Transport {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl Transport {
    pub(crate) fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        Ok(Self {
            http: build_http(config)?,
            base_url: config.normalized_url()?,
            credentials,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send with a bearer token, refreshing once if the server answers 401.
    pub(crate) async fn send(&self, build: impl Fn(&Client) -> RequestBuilder) -> Result<Response> {
        let token = self.credentials.access_token().await?;
        let response = build(&self.http)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!("Access token rejected, attempting refresh");
        let token = self.credentials.refresh().await?;
        build(&self.http)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(map_send_error)
    }
}

/// Decode a JSON body or turn the status into an error.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {what}: {e}")))
}

/// Accept any 2xx and discard the body.
pub(crate) async fn expect_success(response: Response) -> Result<()> {
    check_status(response).await.map(drop)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED {
        Err(ClientError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}
