//! Account registration and authentication over the user repository port.
//!
//! In hexagonal terms this is the driving use-case the HTTP adapter calls to
//! register and authenticate users without knowing the backing
//! infrastructure, which keeps handler tests deterministic.

use std::sync::Arc;

use crate::domain::auth::{LoginCredentials, PasswordHash};
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::Error;
use crate::domain::user::{DisplayName, User, UserId};

/// Generic credential-failure notice.
///
/// Deliberately identical for unknown-user and wrong-password so responses do
/// not enumerate accounts.
const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Registration and login use-cases.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

impl AccountService {
    /// Create a service backed by the given user repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account, hashing the password before it is stored.
    ///
    /// The username must satisfy display-name rules; duplicate names are not
    /// checked here (matching the store's behaviour).
    pub async fn register(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let display_name = DisplayName::new(credentials.username())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let password_hash = PasswordHash::derive(credentials.password())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        self.users
            .insert(&display_name, &password_hash)
            .await
            .map_err(map_persistence_error)
    }

    /// Authenticate credentials and return the session-safe identity.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let account = self
            .users
            .find_by_name(credentials.username())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let matches = account
            .password_hash()
            .verify(credentials.password())
            .map_err(|err| Error::internal(format!("stored hash unusable: {err}")))?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(account.into_user())
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccountService")
    }
}
