//! User entity and its role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Email, Password, ValidationError};
use crate::store::Record;

// == User Type ==
/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Admin,
    User,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "Admin",
            UserType::User => "User",
        }
    }
}

impl FromStr for UserType {
    type Err = ValidationError;

    /// Exact, case-sensitive match on `Admin` or `User`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Admin" => Ok(UserType::Admin),
            "User" => Ok(UserType::User),
            other => Err(ValidationError::InvalidUserType(other.to_string())),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == User ==
/// A validated user record. The email is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub email: Email,
    pub password: Password,
    pub active: bool,
    pub user_type: UserType,
}

impl User {
    /// Builds a user, trimming the name and rejecting a blank one.
    pub fn new(
        name: &str,
        email: Email,
        password: Password,
        active: bool,
        user_type: UserType,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingFields(vec!["Name"]));
        }

        Ok(Self {
            name: name.to_string(),
            email,
            password,
            active,
            user_type,
        })
    }
}

impl Record for User {
    fn key(&self) -> &str {
        self.email.as_str()
    }
}
