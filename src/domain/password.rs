//! Password value object.
//!
//! Only a bcrypt hash is kept. The cost is chosen by the caller so tests
//! can hash at the minimum work factor.

use std::fmt;

use crate::domain::{PasswordError, ValidationError};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Work factor used when none is configured.
pub const DEFAULT_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Lowest work factor bcrypt accepts.
pub const MIN_HASH_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_HASH_COST: u32 = 31;

/// A hashed password. The raw value is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Hashes `raw` at [`DEFAULT_HASH_COST`].
    pub fn hash(raw: &str) -> Result<Self, PasswordError> {
        Self::hash_with_cost(raw, DEFAULT_HASH_COST)
    }

    /// Hashes `raw` with a fresh salt at the given bcrypt cost.
    pub fn hash_with_cost(raw: &str, cost: u32) -> Result<Self, PasswordError> {
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH).into());
        }

        Ok(Self(bcrypt::hash(raw, cost)?))
    }

    /// True if `raw` matches this password. A malformed hash never matches.
    pub fn verify(&self, raw: &str) -> bool {
        bcrypt::verify(raw, &self.0).unwrap_or(false)
    }

    /// The encoded hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(raw: &str) -> Password {
        Password::hash_with_cost(raw, MIN_HASH_COST).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = "secret123";
        let password = hash(raw);

        assert_ne!(password.as_str(), raw);
        assert!(password.as_str().starts_with("$2"));
        assert!(password.verify(raw));
        assert!(!password.verify("wrongpass"));
    }

    #[test]
    fn test_min_length() {
        let err = Password::hash_with_cost("12345", MIN_HASH_COST).unwrap_err();
        assert!(matches!(
            err,
            PasswordError::Invalid(ValidationError::PasswordTooShort(6))
        ));
        assert!(err.to_string().contains("at least 6"));
        assert!(Password::hash_with_cost("123456", MIN_HASH_COST).is_ok());
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let password = Password::hash_with_cost("secret123", 5).unwrap();
        assert!(password.as_str().contains("$05$"));
    }

    #[test]
    fn test_invalid_cost_is_a_hashing_error() {
        let err = Password::hash_with_cost("secret123", MAX_HASH_COST + 1).unwrap_err();
        assert!(matches!(err, PasswordError::Hashing(_)));
    }

    #[test]
    fn test_same_raw_hashes_differently() {
        let p1 = hash("samepassword");
        let p2 = hash("samepassword");

        assert_ne!(p1, p2);
        assert!(p1.verify("samepassword"));
        assert!(p2.verify("samepassword"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        for bad in ["", "not-a-hash", "$", "zz$00", "$2b$04$short"] {
            assert!(!Password(bad.to_string()).verify("anything"), "{bad:?}");
        }
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = hash("secret123");
        assert!(!format!("{:?}", password).contains(password.as_str()));
    }
}
