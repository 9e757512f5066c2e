//! User references held by the administration core.
//!
//! Users are owned by the identity store. The core keeps validated
//! identifiers and read-only snapshots used to render membership views.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    PaddedId,
    EmptyUserName,
    UserNameTooLong { max: usize },
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::PaddedId => write!(f, "user id must not carry surrounding whitespace"),
            Self::EmptyUserName => write!(f, "user name must not be empty"),
            Self::UserNameTooLong { max } => {
                write!(f, "user name must be at most {max} characters")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier assigned by the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 256;

/// Login name of a user, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`] from owned input.
    pub fn new(user_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(user_name.into())
    }

    fn from_owned(user_name: String) -> Result<Self, UserValidationError> {
        let trimmed = user_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUserName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::UserNameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Upper-cased form used for case-insensitive lookups.
    pub fn normalized(&self) -> String {
        self.0.to_uppercase()
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Read-only user snapshot returned by the identity store.
///
/// ## Invariants
/// - `id` is non-empty and carries no surrounding whitespace.
/// - `user_name` is non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    user_name: UserName,
    email: Option<String>,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, user_name: UserName) -> Self {
        Self {
            id,
            user_name,
            email: None,
        }
    }

    /// Attach a contact email to the snapshot.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.email = (!email.trim().is_empty()).then_some(email);
        self
    }

    /// Fallible constructor enforcing identifier and name invariants.
    ///
    /// Prefer [`User::new`] when components are already validated.
    pub fn try_from_strings(
        id: impl AsRef<str>,
        user_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let id = UserId::new(id)?;
        let user_name = UserName::new(user_name)?;

        Ok(Self::new(id, user_name))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name shown in membership views.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Contact email, when the store recorded one.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    #[serde(alias = "user_name")]
    user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            user_name,
            email,
        } = value;
        Self {
            id: id.into(),
            user_name: user_name.into(),
            email,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let user = User::try_from_strings(value.id, value.user_name)?;
        Ok(match value.email {
            Some(email) => user.with_email(email),
            None => user,
        })
    }
}

/// Account details handed to the identity store when creating a user.
///
/// The password is passed through untouched; hashing and policy checks are
/// the store's concern. It is wiped from memory when the value is dropped
/// and never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    user_name: UserName,
    email: Option<String>,
    password: Zeroizing<String>,
}

impl NewUser {
    /// Validate the account inputs.
    pub fn try_new(
        user_name: impl Into<String>,
        email: Option<String>,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let user_name = UserName::new(user_name)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            user_name,
            email: email.filter(|value| !value.trim().is_empty()),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested login name.
    pub fn user_name(&self) -> &UserName {
        &self.user_name
    }

    /// Requested contact email.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Plain-text password for the store to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
