//! User identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::auth::PasswordHash;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, hyphens, or underscores",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a store-assigned identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw identifier value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

/// Human readable display name for the user.
///
/// ## Invariants
/// - Non-empty once trimmed of whitespace.
/// - At most [`DISPLAY_NAME_MAX`] characters.
/// - Letters (any script), digits, spaces, hyphens, and underscores only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        let allowed =
            |c: char| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_';
        if !trimmed.chars().all(allowed) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Authenticated user identity carried through sessions and handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, display_name: DisplayName) -> Self {
        Self { id, display_name }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }
}

/// Stored account record as read by the user repository.
///
/// Carries the password hash so the account service can verify credentials;
/// never serialised and never handed to the HTTP adapter.
#[derive(Debug, Clone)]
pub struct UserAccount {
    id: UserId,
    display_name: DisplayName,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Build an account record from validated components.
    pub fn new(id: UserId, display_name: DisplayName, password_hash: PasswordHash) -> Self {
        Self {
            id,
            display_name,
            password_hash,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name used for login lookups.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Reduce to the session-safe identity.
    pub fn into_user(self) -> User {
        User::new(self.id, self.display_name)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada Lovelace")]
    #[case("aka_n")]
    #[case("Kwamé-2")]
    fn display_name_accepts_reasonable_names(#[case] input: &str) {
        let name = DisplayName::new(input).expect("valid display name");
        assert_eq!(name.as_ref(), input);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyDisplayName)]
    #[case("   ", UserValidationError::EmptyDisplayName)]
    #[case("a<script>b", UserValidationError::DisplayNameInvalidCharacters)]
    fn display_name_rejects_invalid_input(
        #[case] input: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = DisplayName::new(input).expect_err("invalid display name");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn display_name_rejects_overlong_input() {
        let err = DisplayName::new("x".repeat(DISPLAY_NAME_MAX + 1)).expect_err("too long");
        assert_eq!(
            err,
            UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            }
        );
    }

    #[rstest]
    fn display_name_trims_surrounding_whitespace() {
        let name = DisplayName::new("  Ada  ").expect("valid display name");
        assert_eq!(name.as_ref(), "Ada");
    }
}
