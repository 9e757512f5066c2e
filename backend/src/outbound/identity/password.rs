//! Password policy and hashing for the bundled identity store.
//!
//! Policy checks report every rule a password breaks, in a fixed order, so
//! callers can show the complete list at once. Accepted passwords are stored
//! as Argon2id PHC strings with a random salt.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Complexity rules applied when a user account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
    /// Require at least one ASCII digit.
    pub require_digit: bool,
    /// Require at least one lower-case letter.
    pub require_lowercase: bool,
    /// Require at least one upper-case letter.
    pub require_uppercase: bool,
    /// Require at least one character that is neither a letter nor a digit.
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_symbol: true,
        }
    }
}

impl PasswordPolicy {
    /// Policy that accepts any non-empty password.
    pub const fn permissive() -> Self {
        Self {
            min_length: 1,
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            require_symbol: false,
        }
    }

    /// Return every rule the password breaks. Empty when it is acceptable.
    pub fn violations(&self, password: &str) -> Vec<String> {
        let mut messages = Vec::new();
        if password.chars().count() < self.min_length {
            messages.push(format!(
                "passwords must be at least {} characters",
                self.min_length
            ));
        }
        if self.require_symbol && password.chars().all(char::is_alphanumeric) {
            messages.push("passwords must have at least one non-alphanumeric character".to_owned());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            messages.push("passwords must have at least one digit ('0'-'9')".to_owned());
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            messages.push("passwords must have at least one lowercase letter".to_owned());
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            messages.push("passwords must have at least one uppercase letter".to_owned());
        }
        messages
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string, which embeds the algorithm, parameters and salt.
pub(super) fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use rstest::rstest;

    #[rstest]
    fn strong_password_passes_default_policy() {
        assert!(PasswordPolicy::default().violations("Secret123$").is_empty());
    }

    #[rstest]
    fn weak_password_reports_every_rule() {
        let violations = PasswordPolicy::default().violations("abc");
        assert_eq!(
            violations,
            [
                "passwords must be at least 6 characters",
                "passwords must have at least one non-alphanumeric character",
                "passwords must have at least one digit ('0'-'9')",
                "passwords must have at least one uppercase letter",
            ]
        );
    }

    #[rstest]
    #[case("a")]
    #[case("plain")]
    fn permissive_policy_accepts_anything(#[case] password: &str) {
        assert!(PasswordPolicy::permissive().violations(password).is_empty());
    }

    #[rstest]
    fn hash_is_salted_argon2id_and_verifies() {
        let first = hash_password("Secret123$").expect("hash");
        let second = hash_password("Secret123$").expect("hash");

        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("Secret123$"));
        assert_ne!(first, second);

        let parsed = PasswordHash::new(&first).expect("PHC string");
        assert!(
            Argon2::default()
                .verify_password(b"Secret123$", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"Secret123%", &parsed)
                .is_err()
        );
    }
}
