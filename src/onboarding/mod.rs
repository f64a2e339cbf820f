//! First-run flow: collect a few preferences, then create a guest account.
//!
//! The steps are linear. [`OnboardingFlow`] holds the selections in memory
//! until [`OnboardingFlow::finish`] hands them to the account-provisioning
//! collaborator; nothing here is persisted across restarts.

pub mod flow;

use std::fmt;

use thiserror::Error;

use crate::models::GuestAccountRequest;

pub use flow::{OnboardingFlow, OnboardingOutcome};

/// Favourite categories the picker lets a user select. The state itself
/// accepts any number.
pub const MAX_FAVORITE_CATEGORIES: usize = 10;

pub const DEFAULT_CURRENCY_CODE: &str = "USD";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OnboardingStep {
    #[default]
    Welcome,
    CategorySelection,
    CurrencySelection,
    WalletSetup,
}

impl OnboardingStep {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            OnboardingStep::Welcome => 0,
            OnboardingStep::CategorySelection => 1,
            OnboardingStep::CurrencySelection => 2,
            OnboardingStep::WalletSetup => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(OnboardingStep::Welcome),
            1 => Some(OnboardingStep::CategorySelection),
            2 => Some(OnboardingStep::CurrencySelection),
            3 => Some(OnboardingStep::WalletSetup),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self == OnboardingStep::WalletSetup
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OnboardingStep::Welcome => "Welcome",
            OnboardingStep::CategorySelection => "Categories",
            OnboardingStep::CurrencySelection => "Currency",
            OnboardingStep::WalletSetup => "Wallet",
        };
        f.write_str(label)
    }
}

/// Selections gathered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingState {
    pub step: OnboardingStep,
    pub main_currency_code: String,
    /// Category ids in the order they were picked, without duplicates.
    pub favorite_categories: Vec<String>,
    /// Opening balance of the default wallet in minor units.
    pub wallet_initial_balance: i64,
    pub completed: bool,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            step: OnboardingStep::Welcome,
            main_currency_code: DEFAULT_CURRENCY_CODE.into(),
            favorite_categories: Vec::new(),
            wallet_initial_balance: 0,
            completed: false,
        }
    }
}

impl OnboardingState {
    /// Whether the category picker should still accept another selection.
    pub fn can_add_favorite(&self) -> bool {
        self.favorite_categories.len() < MAX_FAVORITE_CATEGORIES
    }

    pub fn is_favorite(&self, category_id: &str) -> bool {
        self.favorite_categories.iter().any(|id| id == category_id)
    }

    pub fn payload(&self) -> GuestAccountRequest {
        GuestAccountRequest {
            main_currency_code: self.main_currency_code.clone(),
            favorite_categories: self.favorite_categories.clone(),
            wallet_initial_balance: self.wallet_initial_balance,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("onboarding cannot finish from the {0} step")]
    NotReady(OnboardingStep),
    #[error("onboarding submission already in progress")]
    InFlight,
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
}
