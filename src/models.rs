//! Wire-level records exchanged with the Spendly backend.
//!
//! Field names follow the API's camelCase JSON. Money is carried as `i64`
//! minor units (cents).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Guest accounts have no email until they are upgraded.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub total_balance: i64,
    pub main_currency_code: String,
}

impl User {
    pub fn is_guest(&self) -> bool {
        self.email.as_deref().map_or(true, str::is_empty)
    }

    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "Guest".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Preferences collected by onboarding and sent when the guest account is
/// created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccountRequest {
    pub main_currency_code: String,
    pub favorite_categories: Vec<String>,
    pub wallet_initial_balance: i64,
}

/// Account returned with a fresh token pair, either a new guest or a guest
/// that was just upgraded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedAccount {
    pub user: User,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// Credentials that turn a guest into a registered account. The guest's data
/// is kept by the backend.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpgradeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AccountUpgradeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountUpgradeRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
}

impl ReportSummary {
    /// Income minus expense for the window.
    pub fn net(&self) -> i64 {
        self.total_income - self.total_expense
    }
}
