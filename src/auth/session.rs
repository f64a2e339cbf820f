use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    errors::SpendlyError,
    models::{AccountUpgradeRequest, AuthTokens, User},
    ports::{AccountUpgrader, ProfileSource, SessionEstablisher, SessionRevoker, TokenRefresher},
};

use super::TokenStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token storage failed: {0}")]
    Storage(#[from] SpendlyError),
    #[error("no active session")]
    NotSignedIn,
    #[error("backend rejected the request: {0}")]
    Remote(String),
}

/// Where the session is in its `init -> active -> teardown` lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Stored tokens have not been checked yet.
    #[default]
    Uninitialized,
    Active {
        user: User,
        access_token: String,
    },
    SignedOut,
}

/// Authenticated-session context shared by the screens that need it.
///
/// Tokens go through a [`TokenStore`]; the in-memory state mirrors what the
/// store holds after each transition.
pub struct AuthSession<S: TokenStore> {
    store: S,
    state: RwLock<SessionState>,
}

impl<S: TokenStore> AuthSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    /// Restores a previous session from stored tokens.
    ///
    /// The stored access token is confirmed with `profile`; if it is
    /// rejected, or the stored tokens cannot be read, they are removed and
    /// the session ends signed out. Returns whether the session is
    /// authenticated afterwards.
    pub async fn initialize<P>(&self, profile: &P) -> Result<bool, SessionError>
    where
        P: ProfileSource + ?Sized,
    {
        let Some(tokens) = self.readable(self.store.tokens()) else {
            tracing::debug!("no stored tokens, starting signed out");
            *self.write() = SessionState::SignedOut;
            return Ok(false);
        };

        match profile.current_user(&tokens.access_token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                *self.write() = SessionState::Active {
                    user,
                    access_token: tokens.access_token,
                };
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored session rejected, clearing tokens");
                self.store.remove_tokens()?;
                *self.write() = SessionState::SignedOut;
                Ok(false)
            }
        }
    }

    /// Swaps the stored refresh token for a new pair.
    ///
    /// Without a refresh token, or when `refresher` rejects it, the session
    /// is signed out and `Ok(false)` is returned.
    pub async fn refresh<R>(&self, refresher: &R) -> Result<bool, SessionError>
    where
        R: TokenRefresher + ?Sized,
    {
        let Some(refresh_token) = self.readable(self.store.refresh_token()) else {
            self.sign_out()?;
            return Ok(false);
        };

        match refresher.refresh_tokens(&refresh_token).await {
            Ok(tokens) => {
                self.store.save_tokens(&tokens)?;
                if let SessionState::Active { access_token, .. } = &mut *self.write() {
                    *access_token = tokens.access_token;
                }
                tracing::debug!("tokens refreshed");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh rejected, signing out");
                self.sign_out()?;
                Ok(false)
            }
        }
    }

    /// Converts the signed-in guest into a registered account and continues
    /// with the tokens issued for it.
    pub async fn upgrade<U>(
        &self,
        upgrader: &U,
        request: &AccountUpgradeRequest,
    ) -> Result<User, SessionError>
    where
        U: AccountUpgrader + ?Sized,
    {
        let access_token = self.access_token().ok_or(SessionError::NotSignedIn)?;
        let account = upgrader
            .upgrade_guest(&access_token, request)
            .await
            .map_err(|err| SessionError::Remote(err.to_string()))?;
        self.sign_in(account.user.clone(), &account.tokens)?;
        Ok(account.user)
    }

    /// Persists `tokens` and marks `user` as signed in.
    pub fn sign_in(&self, user: User, tokens: &AuthTokens) -> Result<(), SessionError> {
        self.store.save_tokens(tokens)?;
        tracing::info!(user_id = %user.id, "session established");
        *self.write() = SessionState::Active {
            user,
            access_token: tokens.access_token.clone(),
        };
        Ok(())
    }

    /// Tears the session down and forgets the stored tokens.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.store.remove_tokens()?;
        *self.write() = SessionState::SignedOut;
        tracing::info!("signed out");
        Ok(())
    }

    /// Revokes the session on the backend, then signs out locally. A failed
    /// revocation is logged and does not keep the user signed in.
    pub async fn log_out<R>(&self, revoker: &R) -> Result<(), SessionError>
    where
        R: SessionRevoker + ?Sized,
    {
        if let Some(access_token) = self.access_token() {
            if let Err(err) = revoker.revoke_session(&access_token).await {
                tracing::warn!(error = %err, "backend logout failed");
            }
        }
        self.sign_out()
    }

    pub fn state(&self) -> SessionState {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.read(), SessionState::Active { .. })
    }

    /// `true` until [`initialize`](Self::initialize) or a sign-in has run.
    pub fn is_loading(&self) -> bool {
        matches!(*self.read(), SessionState::Uninitialized)
    }

    pub fn user(&self) -> Option<User> {
        match &*self.read() {
            SessionState::Active { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        match &*self.read() {
            SessionState::Active { access_token, .. } => Some(access_token.clone()),
            _ => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unreadable token data is removed so the next start does not trip over
    /// it again.
    fn readable<T>(&self, stored: Result<Option<T>, SpendlyError>) -> Option<T> {
        match stored {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "stored tokens unreadable, discarding");
                if let Err(err) = self.store.remove_tokens() {
                    tracing::warn!(error = %err, "failed to remove unreadable tokens");
                }
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<S: TokenStore> SessionEstablisher for AuthSession<S> {
    type Error = SessionError;

    async fn establish(&self, user: &User, tokens: &AuthTokens) -> Result<(), SessionError> {
        self.sign_in(user.clone(), tokens)
    }
}
