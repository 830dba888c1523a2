//! Password strength checks and hashing.
//!
//! `ValidatedPassword` wraps a string that passed the strength check and
//! `PasswordHash` is the salted bcrypt hash that gets stored.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// `user_inputs` are strings the user has entered elsewhere, such as their
    /// email address and trucker name. Passwords built from them are weaker.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with suggestions for a stronger password if the
    /// password is too easy to guess.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Only for tests and tools where the caller has already vetted the password.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with the given bcrypt `cost`.
    ///
    /// Pass in [PasswordHash::DEFAULT_COST] outside of tests.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check the strength of `raw_password` and hash it.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] or [Error::HashingError].
    pub fn from_raw_password(
        raw_password: &str,
        user_inputs: &[&str],
        cost: u32,
    ) -> Result<Self, Error> {
        PasswordHash::new(ValidatedPassword::new(raw_password, user_inputs)?, cost)
    }

    /// Check that `raw_password` matches the stored hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }

    /// The hash as it is stored in the database.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, auth::ValidatedPassword};

    #[test]
    fn rejects_empty_password() {
        assert!(matches!(
            ValidatedPassword::new("", &[]),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn rejects_common_password() {
        assert!(matches!(
            ValidatedPassword::new("password123", &[]),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn rejects_password_built_from_user_inputs() {
        assert!(matches!(
            ValidatedPassword::new("juan.delacruz@example.com", &["juan.delacruz@example.com"]),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn accepts_long_unusual_password() {
        assert!(ValidatedPassword::new("gravel-hauler-quarry-sunrise-42", &[]).is_ok());
    }

    #[test]
    fn display_hides_password() {
        assert_eq!(
            ValidatedPassword::new_unchecked("hunter2").to_string(),
            "********"
        );
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::auth::{PasswordHash, ValidatedPassword};

    #[test]
    fn hash_verifies_original_password_only() {
        let hash = PasswordHash::from_raw_password("gravel-hauler-quarry-sunrise-42", &[], 4)
            .unwrap();

        assert!(hash.verify("gravel-hauler-quarry-sunrise-42").unwrap());
        assert!(!hash.verify("the_wrong_password").unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let password = ValidatedPassword::new_unchecked("turkeysgogobblegobble");

        let first = PasswordHash::new(password.clone(), 4).unwrap();
        let second = PasswordHash::new(password, 4).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn from_raw_password_rejects_weak_password() {
        assert!(PasswordHash::from_raw_password("password1234", &[], 4).is_err());
    }
}
