//! Domain Module
//!
//! User entity and the value objects it is built from. Everything here is
//! validated on construction; the store never re-validates.

mod email;
mod password;
mod user;

use thiserror::Error;

pub use email::Email;
pub use password::{
    Password, DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST, MIN_PASSWORD_LENGTH,
};
pub use user::{User, UserType};

// == Validation Error ==
/// Reasons a value object or user could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("userType must be one of: Admin, User (got {0:?})")]
    InvalidUserType(String),

    #[error("the following fields are required: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

// == Password Error ==
/// Why a password could not be hashed.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// The raw password was rejected before hashing
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// bcrypt itself failed
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}
