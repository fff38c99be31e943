//! This file defines types that handle password validation and hashing.
//! `ValidatedPassword` wraps a non-blank string.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};

use crate::Error;

/// A password that has been validated, but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyField] if the password is empty or only whitespace.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        if raw_password_string.trim().is_empty() {
            return Err(Error::EmptyField("password"));
        }

        Ok(Self(raw_password_string.to_string()))
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Try to create a password hash from a raw password string.
    ///
    /// This is a convenience function that removes the need to manually create
    /// the intermediate `ValidatedPassword` type.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        let validated_password = ValidatedPassword::new(raw_password)?;
        PasswordHash::new(validated_password, cost)
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}


#[cfg(test)]
mod password_hash_tests {
    use crate::{PasswordHash, ValidatedPassword};

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "okon";

        assert!(hash.verify(password).unwrap());
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "thewrongpassword";

        assert!(!hash.verify(password).unwrap());
    }

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = "roostersgocockledoodledoo";
        let wrong_password = "the_wrong_password";
        let hash = PasswordHash::from_raw_password(password, 4).unwrap();

        assert!(hash.verify(password).unwrap());
        assert!(!hash.verify(wrong_password).unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = ValidatedPassword::new("turkeysgogobblegobble").unwrap();
        let hash = PasswordHash::new(password.clone(), 4).unwrap();
        let dupe_hash = PasswordHash::new(password.clone(), 4).unwrap();

        assert_ne!(hash, dupe_hash);
    }
}
