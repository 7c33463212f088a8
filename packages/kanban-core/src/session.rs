/// Accounts and login sessions.
///
/// Accounts are identified by email and persisted through an
/// [`AccountStore`]. Passwords are kept as salted SHA-256 digests; sessions
/// are opaque random tokens mapped to an account id and live in memory.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::AccountId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
}

/// An account as persisted: identity plus salted password digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(flatten)]
    pub account: Account,
    pub salt: String,
    pub hash: String,
}

/// Where accounts are kept. Implemented by every table-backed board store,
/// so accounts live in the same file as the boards they own.
pub trait AccountStore: Send + Sync {
    fn find_account(&self, email: &str) -> Option<AccountRecord>;

    /// Fails with `AccountExists` if the email is taken.
    fn insert_account(&self, record: AccountRecord) -> Result<(), AuthError>;
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("{0}")]
    InvalidEmail(String),

    #[error("{0}")]
    InvalidPassword(String),

    #[error("User already exists")]
    AccountExists,

    #[error("Account not found!")]
    AccountNotFound,

    #[error("Invalid password")]
    WrongPassword,

    #[error("Account storage failed: {0}")]
    Storage(String),
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.is_empty() {
        Err(AuthError::InvalidEmail("Email is required.".to_string()))
    } else if !email.contains('@') {
        Err(AuthError::InvalidEmail(
            "Please enter a valid email address.".to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        Err(AuthError::InvalidPassword("Password is required.".to_string()))
    } else if password.chars().count() < 6 {
        Err(AuthError::InvalidPassword(
            "Password must be at least 6 characters.".to_string(),
        ))
    } else {
        Ok(())
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Account registry over an [`AccountStore`].
pub struct Accounts {
    store: Arc<dyn AccountStore>,
}

impl Accounts {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub fn register(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        if self.store.find_account(email).is_some() {
            return Err(AuthError::AccountExists);
        }
        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        let salt = uuid::Uuid::new_v4().simple().to_string();
        self.store.insert_account(AccountRecord {
            account: account.clone(),
            hash: digest(&salt, password),
            salt,
        })?;
        log::info!("Registered account {} ({})", account.email, account.id);
        Ok(account)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        let record = self
            .store
            .find_account(email)
            .ok_or(AuthError::AccountNotFound)?;
        if digest(&record.salt, password) != record.hash {
            return Err(AuthError::WrongPassword);
        }
        Ok(record.account)
    }

    pub fn exists(&self, email: &str) -> bool {
        self.store.find_account(email).is_some()
    }
}

/// Resolves the account behind a session token.
pub trait SessionLookup: Send + Sync {
    fn current_account(&self, token: &str) -> Option<AccountId>;
}

/// The account of `token`, or `Unauthenticated`.
pub fn require_auth(
    sessions: &dyn SessionLookup,
    token: Option<&str>,
) -> Result<AccountId, AuthError> {
    token
        .and_then(|t| sessions.current_account(t))
        .ok_or(AuthError::Unauthenticated)
}

/// In-memory session tokens.
#[derive(Default)]
pub struct SessionStore {
    tokens: RwLock<HashMap<String, AccountId>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `account` and return its token.
    pub fn open(&self, account: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens
            .write()
            .unwrap()
            .insert(token.clone(), account.to_string());
        token
    }

    /// End a session. Returns false if the token was unknown.
    pub fn close(&self, token: &str) -> bool {
        self.tokens.write().unwrap().remove(token).is_some()
    }
}

impl SessionLookup for SessionStore {
    fn current_account(&self, token: &str) -> Option<AccountId> {
        self.tokens.read().unwrap().get(token).cloned()
    }
}
