//! REST client for the Spendly backend.
//!
//! Every endpoint answers with an `{ "message", "data" }` envelope. Errors
//! carry the server's `message` when the body has one. Retries are left to
//! the caller.

pub mod resources;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::Config,
    models::{
        AccountUpgradeRequest, AuthTokens, GuestAccountRequest, IssuedAccount, ReportSummary,
        User,
    },
    period::DateRange,
    ports::{
        AccountProvisioner, AccountUpgrader, ProfileSource, ReportSource, SessionRevoker,
        TokenRefresher,
    },
};

pub use resources::{Resource, ResourceSet};

const GUEST_PATH: &str = "auth/guest";
const UPGRADE_PATH: &str = "auth/upgrade";
const REFRESH_PATH: &str = "auth/refresh";
const LOGOUT_PATH: &str = "auth/logout";
const ME_PATH: &str = "auth/me";
const REPORT_SUMMARY_PATH: &str = "reports/summary";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

/// Success envelope wrapping every payload.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Stateless client: authenticated calls take the access token as an
/// argument.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(request).await?;
        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(envelope.data)
    }

    /// Runs `request` and returns the raw body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            tracing::debug!(status = status.as_u16(), %message, "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

/// Pulls a readable message out of an error body. Validation failures list
/// several messages in an array; those are joined.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message")? {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!message.is_empty()).then_some(message)
}

#[async_trait]
impl AccountProvisioner for ApiClient {
    type Error = ApiError;

    async fn create_guest_account(
        &self,
        request: &GuestAccountRequest,
    ) -> Result<IssuedAccount, ApiError> {
        tracing::debug!(currency = %request.main_currency_code, "creating guest account");
        self.send(self.http.post(self.url(GUEST_PATH)).json(request))
            .await
    }
}

#[async_trait]
impl ProfileSource for ApiClient {
    type Error = ApiError;

    async fn current_user(&self, access_token: &str) -> Result<User, ApiError> {
        self.send(self.http.get(self.url(ME_PATH)).bearer_auth(access_token))
            .await
    }
}

#[async_trait]
impl TokenRefresher for ApiClient {
    type Error = ApiError;

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let body = RefreshRequest { refresh_token };
        self.send(self.http.post(self.url(REFRESH_PATH)).json(&body))
            .await
    }
}

#[async_trait]
impl SessionRevoker for ApiClient {
    type Error = ApiError;

    /// The response body carries nothing the client needs, so only the status
    /// is checked.
    async fn revoke_session(&self, access_token: &str) -> Result<(), ApiError> {
        self.execute(self.http.put(self.url(LOGOUT_PATH)).bearer_auth(access_token))
            .await
            .map(drop)
    }
}

#[async_trait]
impl AccountUpgrader for ApiClient {
    type Error = ApiError;

    async fn upgrade_guest(
        &self,
        access_token: &str,
        request: &AccountUpgradeRequest,
    ) -> Result<IssuedAccount, ApiError> {
        let request = self
            .http
            .post(self.url(UPGRADE_PATH))
            .bearer_auth(access_token)
            .json(request);
        self.send(request).await
    }
}

#[async_trait]
impl ReportSource for ApiClient {
    type Error = ApiError;

    async fn summary(
        &self,
        access_token: &str,
        range: &DateRange,
    ) -> Result<ReportSummary, ApiError> {
        let request = self
            .http
            .get(self.url(REPORT_SUMMARY_PATH))
            .bearer_auth(access_token)
            .query(&range.query_params());
        self.send(request).await
    }
}
