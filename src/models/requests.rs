//! Request DTOs for the user API
//!
//! Defines the structure of incoming HTTP request bodies. `validate` covers
//! presence and enumerated values only; format rules live in the domain.

use serde::Deserialize;

use crate::domain::{UserType, ValidationError};

/// Request body for `POST /api/v1/users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Defaults to `true` when omitted
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, rename = "userType")]
    pub user_type: String,
}

impl CreateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Name");
        }
        if self.email.trim().is_empty() {
            missing.push("Email");
        }
        if self.password.is_empty() {
            missing.push("Password");
        }
        if self.user_type.trim().is_empty() {
            missing.push("UserType");
        }
        if !missing.is_empty() {
            return Some(ValidationError::MissingFields(missing).to_string());
        }

        self.user_type
            .parse::<UserType>()
            .err()
            .map(|err| err.to_string())
    }
}

/// Request body for `PUT /api/v1/users/:email`
///
/// Every field is optional. Absent or blank fields keep the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default, rename = "userType")]
    pub user_type: Option<String>,
}

impl UpdateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match self.user_type.as_deref().map(str::trim) {
            Some(user_type) if !user_type.is_empty() => user_type
                .parse::<UserType>()
                .err()
                .map(|err| err.to_string()),
            _ => None,
        }
    }
}
