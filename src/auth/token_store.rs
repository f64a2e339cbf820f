use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::{
    errors::SpendlyError,
    models::AuthTokens,
    utils::paths::{self, write_atomic},
};

/// Persistence for the access/refresh token pair.
pub trait TokenStore: Send + Sync {
    fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), SpendlyError>;

    /// Returns the stored pair, or `None` when either half is missing.
    fn tokens(&self) -> Result<Option<AuthTokens>, SpendlyError>;

    fn remove_tokens(&self) -> Result<(), SpendlyError>;

    fn access_token(&self) -> Result<Option<String>, SpendlyError> {
        Ok(self.tokens()?.map(|tokens| tokens.access_token))
    }

    fn refresh_token(&self) -> Result<Option<String>, SpendlyError> {
        Ok(self.tokens()?.map(|tokens| tokens.refresh_token))
    }
}

/// Keeps tokens for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), SpendlyError> {
        *self.tokens.lock().unwrap_or_else(PoisonError::into_inner) = Some(tokens.clone());
        Ok(())
    }

    fn tokens(&self) -> Result<Option<AuthTokens>, SpendlyError> {
        Ok(self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn remove_tokens(&self) -> Result<(), SpendlyError> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Stores tokens as JSON in `session.json`, readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new() -> Self {
        Self::in_dir(&paths::app_data_dir())
    }

    pub fn in_dir(base: &Path) -> Self {
        Self {
            path: paths::session_file_in(base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), SpendlyError> {
        let json = serde_json::to_string(tokens)?;
        write_atomic(&self.path, &json)
    }

    fn tokens(&self) -> Result<Option<AuthTokens>, SpendlyError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let tokens: AuthTokens = serde_json::from_str(&data)?;
        if tokens.access_token.is_empty() || tokens.refresh_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(tokens))
    }

    fn remove_tokens(&self) -> Result<(), SpendlyError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
