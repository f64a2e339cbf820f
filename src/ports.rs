//! Async seams to the collaborators this crate drives but does not own.
//!
//! [`crate::api::ApiClient`] implements the remote ports and
//! [`crate::auth::AuthSession`] implements [`SessionEstablisher`]; tests plug
//! in their own doubles. Ports that need an authenticated caller take the
//! access token per call, so the session stays the only owner of it.

use async_trait::async_trait;

use crate::{
    models::{
        AccountUpgradeRequest, AuthTokens, GuestAccountRequest, IssuedAccount, ReportSummary,
        User,
    },
    period::DateRange,
};

/// Creates guest accounts from onboarding selections.
#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn create_guest_account(
        &self,
        request: &GuestAccountRequest,
    ) -> Result<IssuedAccount, Self::Error>;
}

/// Turns freshly issued credentials into an authenticated session.
#[async_trait]
pub trait SessionEstablisher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn establish(&self, user: &User, tokens: &AuthTokens) -> Result<(), Self::Error>;
}

/// Resolves the user that owns an access token.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn current_user(&self, access_token: &str) -> Result<User, Self::Error>;
}

/// Exchanges a refresh token for a new token pair.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthTokens, Self::Error>;
}

/// Invalidates a session on the backend.
#[async_trait]
pub trait SessionRevoker: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn revoke_session(&self, access_token: &str) -> Result<(), Self::Error>;
}

/// Promotes the guest behind `access_token` to a registered account.
#[async_trait]
pub trait AccountUpgrader: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn upgrade_guest(
        &self,
        access_token: &str,
        request: &AccountUpgradeRequest,
    ) -> Result<IssuedAccount, Self::Error>;
}

/// Totals for a reporting window.
#[async_trait]
pub trait ReportSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn summary(
        &self,
        access_token: &str,
        range: &DateRange,
    ) -> Result<ReportSummary, Self::Error>;
}
