//! Role entities managed by the role registry.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the role constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleValidationError {
    EmptyId,
    PaddedId,
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for RoleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "role id must not be empty"),
            Self::PaddedId => write!(f, "role id must not carry surrounding whitespace"),
            Self::EmptyName => write!(f, "role name must not be empty"),
            Self::NameTooLong { max } => write!(f, "role name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for RoleValidationError {}

/// Opaque role identifier. Immutable once the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleId(String);

impl RoleId {
    /// Validate and construct a [`RoleId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, RoleValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`RoleId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn from_owned(id: String) -> Result<Self, RoleValidationError> {
        if id.trim().is_empty() {
            return Err(RoleValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(RoleValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for RoleId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RoleId> for String {
    fn from(value: RoleId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RoleId {
    type Error = RoleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a role name.
pub const ROLE_NAME_MAX: usize = 256;

/// Human readable role name, stored trimmed.
///
/// Equality is exact; use [`RoleName::normalized`] for the case-insensitive
/// key identity stores compare on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Validate and construct a [`RoleName`] from owned input.
    ///
    /// # Examples
    /// ```
    /// use role_admin::domain::RoleName;
    ///
    /// let name = RoleName::new("  Admins ").unwrap();
    /// assert_eq!(name.as_ref(), "Admins");
    /// assert!(RoleName::new("   ").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, RoleValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, RoleValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RoleValidationError::EmptyName);
        }
        if trimmed.chars().count() > ROLE_NAME_MAX {
            return Err(RoleValidationError::NameTooLong { max: ROLE_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Upper-cased form used for case-insensitive uniqueness checks.
    pub fn normalized(&self) -> String {
        self.0.to_uppercase()
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl TryFrom<String> for RoleName {
    type Error = RoleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Named permission group users can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    id: RoleId,
    name: RoleName,
}

impl Role {
    /// Build a role from validated components.
    pub fn new(id: RoleId, name: RoleName) -> Self {
        Self { id, name }
    }

    /// Stable role identifier.
    pub fn id(&self) -> &RoleId {
        &self.id
    }

    /// Unique role name.
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Listing order: case-insensitive by name, then exact name, then id.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        self.name
            .normalized()
            .cmp(&other.name.normalized())
            .then_with(|| self.name.as_ref().cmp(other.name.as_ref()))
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn role(id: &str, name: &str) -> Role {
        Role::new(
            RoleId::new(id).expect("valid id"),
            RoleName::new(name).expect("valid name"),
        )
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn role_name_rejects_blank_input(#[case] raw: &str) {
        assert_eq!(
            RoleName::new(raw).expect_err("blank name"),
            RoleValidationError::EmptyName
        );
    }

    #[rstest]
    fn role_name_rejects_oversized_input() {
        let err = RoleName::new("r".repeat(ROLE_NAME_MAX + 1)).expect_err("too long");
        assert_eq!(err, RoleValidationError::NameTooLong { max: ROLE_NAME_MAX });
    }

    #[rstest]
    fn normalized_name_ignores_case() {
        let lower = RoleName::new("admins").expect("valid");
        let upper = RoleName::new("ADMINS").expect("valid");
        assert_ne!(lower, upper);
        assert_eq!(lower.normalized(), upper.normalized());
    }

    #[rstest]
    #[case("", RoleValidationError::EmptyId)]
    #[case(" id", RoleValidationError::PaddedId)]
    fn role_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: RoleValidationError) {
        assert_eq!(RoleId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn roles_sort_case_insensitively_by_name() {
        let mut roles = vec![
            role("3", "users"),
            role("1", "Managers"),
            role("2", "admins"),
        ];
        roles.sort_by(Role::cmp_by_name);
        let names: Vec<&str> = roles.iter().map(|r| r.name().as_ref()).collect();
        assert_eq!(names, ["admins", "Managers", "users"]);
    }
}
