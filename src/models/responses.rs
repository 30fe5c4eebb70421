//! Response DTOs for the user API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::domain::{User, UserType};

/// Public view of a user. Never carries the password.
///
/// This is also the value kept in the response cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub active: bool,
    #[serde(rename = "userType")]
    pub user_type: UserType,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.to_string(),
            active: user.active,
            user_type: user.user_type,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub users_created: u64,
    pub users_updated: u64,
    pub users_deleted: u64,
    /// Records currently in the store
    pub total_users: usize,
    pub shard_count: usize,
    pub cache: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub cache_hit_rate: f64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, Password, MIN_HASH_COST};

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new(
            "Ana",
            Email::parse("ana@example.com").unwrap(),
            Password::hash_with_cost("secret123", MIN_HASH_COST).unwrap(),
            true,
            UserType::Admin,
        )
        .unwrap();

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["name"], "Ana");
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["active"], true);
        assert_eq!(json["userType"], "Admin");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("user not found");
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"user not found"}"#);
    }
}
