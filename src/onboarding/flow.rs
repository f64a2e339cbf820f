use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError,
};

use crate::{
    api::ResourceSet,
    models::{GuestAccountRequest, User},
    ports::{AccountProvisioner, SessionEstablisher},
};

use super::{OnboardingError, OnboardingState, OnboardingStep};

/// Result of a successful [`OnboardingFlow::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingOutcome {
    pub user: User,
    /// Everything cached before the account existed is stale.
    pub invalidated: ResourceSet,
}

/// Step machine for the onboarding screens.
///
/// Methods take `&self` so the flow can be shared with whatever renders the
/// progress indicator. While [`finish`](Self::finish) is outstanding the
/// state is frozen: navigation, setters and `reset` are ignored.
#[derive(Debug, Default)]
pub struct OnboardingFlow {
    state: Mutex<OnboardingState>,
    submitting: AtomicBool,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current selections.
    pub fn state(&self) -> OnboardingState {
        self.lock().clone()
    }

    pub fn step(&self) -> OnboardingStep {
        self.lock().step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn is_completed(&self) -> bool {
        self.lock().completed
    }

    pub fn payload(&self) -> GuestAccountRequest {
        self.lock().payload()
    }

    /// Advances one step. Staying on the last step keeps the step in range;
    /// gating (for example "pick at least one category") is the caller's job.
    pub fn next(&self) {
        self.mutate("next", |state| {
            if let Some(step) = state.step.next() {
                state.step = step;
            }
        });
    }

    pub fn prev(&self) {
        self.mutate("prev", |state| {
            if let Some(step) = state.step.prev() {
                state.step = step;
            }
        });
    }

    pub fn set_step(&self, step: OnboardingStep) {
        self.mutate("set_step", |state| state.step = step);
    }

    pub fn set_main_currency_code(&self, code: impl Into<String>) {
        let code = code.into();
        self.mutate("set_main_currency_code", |state| {
            state.main_currency_code = code
        });
    }

    /// Replaces the favourites. Repeated ids keep their first position.
    pub fn set_favorite_categories<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.mutate("set_favorite_categories", |state| {
            state.favorite_categories = unique
        });
    }

    /// Selects `category_id` if it is not a favourite yet, deselects it
    /// otherwise.
    pub fn toggle_favorite_category(&self, category_id: &str) {
        self.mutate("toggle_favorite_category", |state| {
            if state.is_favorite(category_id) {
                state.favorite_categories.retain(|id| id != category_id);
            } else {
                state.favorite_categories.push(category_id.to_string());
            }
        });
    }

    pub fn set_wallet_initial_balance(&self, amount: i64) {
        self.mutate("set_wallet_initial_balance", |state| {
            state.wallet_initial_balance = amount
        });
    }

    pub fn reset(&self) {
        self.mutate("reset", |state| *state = OnboardingState::default());
    }

    /// Creates the guest account and opens a session for it.
    ///
    /// Only valid on the wallet step. On failure the selections and step are
    /// left as they were so the user can press Finish again; nothing is
    /// retried here. On success the collected state is discarded and only
    /// `completed` remains set until [`reset`](Self::reset).
    pub async fn finish<P, S>(
        &self,
        provisioner: &P,
        session: &S,
    ) -> Result<OnboardingOutcome, OnboardingError>
    where
        P: AccountProvisioner + ?Sized,
        S: SessionEstablisher + ?Sized,
    {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("finish ignored, submission already outstanding");
            return Err(OnboardingError::InFlight);
        }
        let _guard = SubmissionGuard(&self.submitting);

        let payload = {
            let state = self.lock();
            if !state.step.is_last() {
                return Err(OnboardingError::NotReady(state.step));
            }
            state.payload()
        };

        let account = provisioner
            .create_guest_account(&payload)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "guest account creation failed");
                OnboardingError::SubmissionFailed(err.to_string())
            })?;

        session
            .establish(&account.user, &account.tokens)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "could not establish session for guest account");
                OnboardingError::SubmissionFailed(err.to_string())
            })?;

        *self.lock() = OnboardingState {
            completed: true,
            ..OnboardingState::default()
        };
        tracing::info!(user_id = %account.user.id, "onboarding completed");

        Ok(OnboardingOutcome {
            user: account.user,
            invalidated: ResourceSet::all(),
        })
    }

    fn mutate(&self, action: &'static str, apply: impl FnOnce(&mut OnboardingState)) {
        let mut state = self.lock();
        // Checked under the lock so a mutation cannot slip in after finish
        // has read the payload.
        if self.is_submitting() {
            tracing::debug!(action, "ignored while onboarding submission is outstanding");
            return;
        }
        apply(&mut state);
        tracing::debug!(action, step = %state.step, "onboarding state updated");
    }

    fn lock(&self) -> MutexGuard<'_, OnboardingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the submission flag on every exit from `finish`, including a
/// dropped future.
struct SubmissionGuard<'a>(&'a AtomicBool);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
