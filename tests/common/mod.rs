#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::Mutex,
};

use async_trait::async_trait;
use spendly_core::{
    config::ConfigManager,
    models::{AccountUpgradeRequest, AuthTokens, GuestAccountRequest, IssuedAccount, User},
    ports::{
        AccountProvisioner, AccountUpgrader, ProfileSource, SessionEstablisher, SessionRevoker,
        TokenRefresher,
    },
};
use tempfile::TempDir;
use tokio::sync::oneshot;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// Creates a config manager rooted in a fresh temporary directory. The
/// returned guard must outlive the manager.
pub fn setup_test_env() -> (TempDir, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let manager =
        ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("create config manager");
    (temp, manager)
}

pub fn guest_user(id: &str) -> User {
    User {
        id: id.into(),
        email: None,
        first_name: None,
        last_name: None,
        avatar_url: None,
        total_balance: 0,
        main_currency_code: "USD".into(),
    }
}

pub fn tokens(suffix: &str) -> AuthTokens {
    AuthTokens {
        access_token: format!("access-{suffix}"),
        refresh_token: format!("refresh-{suffix}"),
    }
}

pub fn guest_account(id: &str) -> IssuedAccount {
    IssuedAccount {
        user: guest_user(id),
        tokens: tokens(id),
    }
}

/// Replies with queued results in order and records every request.
#[derive(Default)]
pub struct ScriptedProvisioner {
    replies: Mutex<VecDeque<Result<IssuedAccount, FakeError>>>,
    requests: Mutex<Vec<GuestAccountRequest>>,
}

impl ScriptedProvisioner {
    pub fn replying(replies: impl IntoIterator<Item = Result<IssuedAccount, FakeError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GuestAccountRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountProvisioner for ScriptedProvisioner {
    type Error = FakeError;

    async fn create_guest_account(
        &self,
        request: &GuestAccountRequest,
    ) -> Result<IssuedAccount, FakeError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FakeError("no scripted reply".into())))
    }
}

/// Blocks until the paired sender fires, then succeeds.
pub struct GatedProvisioner {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedProvisioner {
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

#[async_trait]
impl AccountProvisioner for GatedProvisioner {
    type Error = FakeError;

    async fn create_guest_account(
        &self,
        _request: &GuestAccountRequest,
    ) -> Result<IssuedAccount, FakeError> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.await.map_err(|_| FakeError("gate dropped".into()))?;
        }
        Ok(guest_account("gated"))
    }
}

/// Records established sessions, optionally refusing them.
#[derive(Default)]
pub struct RecordingSession {
    pub refuse: bool,
    established: Mutex<Vec<(User, AuthTokens)>>,
}

impl RecordingSession {
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            established: Mutex::new(Vec::new()),
        }
    }

    pub fn established(&self) -> Vec<(User, AuthTokens)> {
        self.established.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionEstablisher for RecordingSession {
    type Error = FakeError;

    async fn establish(&self, user: &User, tokens: &AuthTokens) -> Result<(), FakeError> {
        if self.refuse {
            return Err(FakeError("secure storage unavailable".into()));
        }
        self.established
            .lock()
            .unwrap()
            .push((user.clone(), tokens.clone()));
        Ok(())
    }
}

/// Accepts exactly one access token.
pub struct StaticProfile {
    pub valid_token: String,
    pub user: User,
}

#[async_trait]
impl ProfileSource for StaticProfile {
    type Error = FakeError;

    async fn current_user(&self, access_token: &str) -> Result<User, FakeError> {
        if access_token == self.valid_token {
            Ok(self.user.clone())
        } else {
            Err(FakeError("401 Unauthorized".into()))
        }
    }
}

/// Accepts exactly one refresh token and answers with `issued`.
pub struct StaticRefresher {
    pub valid_token: String,
    pub issued: AuthTokens,
}

#[async_trait]
impl TokenRefresher for StaticRefresher {
    type Error = FakeError;

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthTokens, FakeError> {
        if refresh_token == self.valid_token {
            Ok(self.issued.clone())
        } else {
            Err(FakeError("refresh token expired".into()))
        }
    }
}

/// Records revoked access tokens, optionally failing every call.
#[derive(Default)]
pub struct RecordingRevoker {
    pub fail: bool,
    revoked: Mutex<Vec<String>>,
}

impl RecordingRevoker {
    pub fn failing() -> Self {
        Self {
            fail: true,
            revoked: Mutex::new(Vec::new()),
        }
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRevoker for RecordingRevoker {
    type Error = FakeError;

    async fn revoke_session(&self, access_token: &str) -> Result<(), FakeError> {
        self.revoked.lock().unwrap().push(access_token.to_string());
        if self.fail {
            return Err(FakeError("backend unreachable".into()));
        }
        Ok(())
    }
}

/// Upgrades the guest holding `valid_token` into `account`.
pub struct StaticUpgrader {
    pub valid_token: String,
    pub account: IssuedAccount,
}

#[async_trait]
impl AccountUpgrader for StaticUpgrader {
    type Error = FakeError;

    async fn upgrade_guest(
        &self,
        access_token: &str,
        _request: &AccountUpgradeRequest,
    ) -> Result<IssuedAccount, FakeError> {
        if access_token == self.valid_token {
            Ok(self.account.clone())
        } else {
            Err(FakeError("email already registered".into()))
        }
    }
}
