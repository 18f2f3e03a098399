//! Port abstraction for user persistence adapters and their errors.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;

use crate::domain::auth::PasswordHash;
use crate::domain::user::{DisplayName, UserAccount, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Outbound port for the user accounts table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account and return the store-assigned identifier.
    ///
    /// No duplicate-name check happens at this layer.
    async fn insert(
        &self,
        display_name: &DisplayName,
        password_hash: &PasswordHash,
    ) -> Result<UserId, UserPersistenceError>;

    /// Fetch an account by display name, hash included, for verification.
    async fn find_by_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;
}

/// In-memory user repository for handler and service tests.
///
/// Assigns sequential identifiers the way a serial column would and keeps
/// insertion order for `find_by_name` (first match wins, mirroring the SQL
/// `LIMIT 1` lookup).
#[derive(Debug)]
pub struct FixtureUserRepository {
    accounts: Mutex<Vec<UserAccount>>,
    next_id: AtomicI32,
}

impl FixtureUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(
        &self,
        display_name: &DisplayName,
        password_hash: &PasswordHash,
    ) -> Result<UserId, UserPersistenceError> {
        let id = UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| UserPersistenceError::query("fixture lock poisoned"))?;
        accounts.push(UserAccount::new(
            id,
            display_name.clone(),
            password_hash.clone(),
        ));
        Ok(id)
    }

    async fn find_by_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| UserPersistenceError::query("fixture lock poisoned"))?;
        Ok(accounts
            .iter()
            .find(|account| account.display_name().as_ref() == display_name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value).expect("valid display name")
    }

    fn hash() -> PasswordHash {
        PasswordHash::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAA")
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_assigns_sequential_identifiers() {
        let repository = FixtureUserRepository::new();
        let first = repository.insert(&name("alice"), &hash()).await.expect("insert");
        let second = repository.insert(&name("bob"), &hash()).await.expect("insert");
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_finds_the_first_matching_account() {
        let repository = FixtureUserRepository::new();
        let first = repository.insert(&name("alice"), &hash()).await.expect("insert");
        // Duplicate names are allowed at this layer; lookup returns the first.
        let _ = repository.insert(&name("alice"), &hash()).await.expect("insert");

        let found = repository
            .find_by_name("alice")
            .await
            .expect("lookup")
            .expect("account present");
        assert_eq!(found.id(), first);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_returns_none_for_unknown_names() {
        let repository = FixtureUserRepository::new();
        assert!(repository.find_by_name("ghost").await.expect("lookup").is_none());
    }
}
