//! Authentication domain types
//!
//! Request/response shapes for the routes that proxy the hosted auth
//! service, plus the subset of its wire formats we parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profiles::ProfileDetail;

/// Sign up request: the signup form fields. Username is free text here and
/// is slugified before anything is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

/// User identity as reported by the auth service
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Signup response when the auth service issues tokens immediately
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: User,
    pub profile: ProfileDetail,
}

/// Signup response when email confirmation is still pending
#[derive(Debug, Clone, Serialize)]
pub struct SignupPendingResponse {
    pub user_id: String,
    pub email: String,
    pub confirmation_required: bool,
    pub message: String,
    pub profile: ProfileDetail,
}

/// Session response for the current authenticated user
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub access_token: String,
    pub expires_at: i64,
}

// Wire formats of the hosted auth service

/// Signup/signin response carrying tokens (email confirmation disabled)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderAuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: ProviderUser,
}

/// Signup response without tokens (email confirmation required)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSignupResponse {
    pub id: String,
    pub email: Option<String>,
    pub confirmation_sent_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub email: Option<String>,
    pub created_at: Option<String>,
}

/// Error body from the auth service; field names vary between the current
/// and legacy formats, so everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorResponse {
    pub msg: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub message: Option<String>,
}

impl ProviderErrorResponse {
    pub fn get_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown authentication error".to_string())
    }
}

impl From<ProviderUser> for User {
    fn from(pu: ProviderUser) -> Self {
        Self {
            id: pu.id,
            email: pu.email,
            created_at: pu.created_at.and_then(|s| s.parse().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_prefers_the_most_specific_field() {
        let err = ProviderErrorResponse {
            msg: Some("User already registered".into()),
            error: Some("invalid_request".into()),
            ..Default::default()
        };
        assert_eq!(err.get_message(), "User already registered");

        let empty = ProviderErrorResponse::default();
        assert_eq!(empty.get_message(), "Unknown authentication error");
    }
}
