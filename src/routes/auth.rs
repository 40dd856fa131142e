//! Authentication routes
//!
//! Signup and session handling proxy the hosted auth service; the profile
//! row is created here once the service has issued an identity.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::response::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::auth::{
    AuthResponse, ProviderAuthResponse, ProviderErrorResponse, ProviderSignupResponse,
    ProviderUser, SessionResponse, SignUpRequest, SignupPendingResponse, User,
};
use crate::domain::search;
use crate::error::{ApiError, ApiResult};
use crate::routes::profiles::insert_profile;

/// POST /auth/signup
///
/// Register a new account and create its profile row. Username is slugified
/// before storage; username, email and password are all required.
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = search::normalize_username(&req.username);

    if username.is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("All fields are required."));
    }

    let response = state
        .http_client
        .post(format!("{}/auth/v1/signup", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({
            "email": req.email,
            "password": req.password,
        }))
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to connect to auth service: {}", e)))?;

    if !response.status().is_success() {
        let error: ProviderErrorResponse = response.json().await.unwrap_or_default();
        return Err(ApiError::bad_request(error.get_message()));
    }

    let response_text = response
        .text()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read auth response: {}", e)))?;

    // Tokens included: email confirmation is disabled or auto-confirmed
    if let Ok(auth_response) = serde_json::from_str::<ProviderAuthResponse>(&response_text) {
        let user_id: uuid::Uuid = auth_response
            .user
            .id
            .parse()
            .map_err(|_| ApiError::internal("Invalid user ID from auth service"))?;

        let profile = insert_profile(&state, user_id, &username, &req).await?;

        let user: User = auth_response.user.into();
        return Ok(Created(DataResponse::new(serde_json::to_value(AuthResponse {
            access_token: auth_response.access_token,
            refresh_token: auth_response.refresh_token,
            expires_in: auth_response.expires_in,
            user,
            profile,
        })?)));
    }

    // No tokens: the user still has to confirm their email
    if let Ok(signup_response) = serde_json::from_str::<ProviderSignupResponse>(&response_text) {
        let user_id: uuid::Uuid = signup_response
            .id
            .parse()
            .map_err(|_| ApiError::internal("Invalid user ID from auth service"))?;

        let profile = insert_profile(&state, user_id, &username, &req).await?;

        let pending = SignupPendingResponse {
            user_id: signup_response.id,
            email: signup_response.email.unwrap_or_default(),
            confirmation_required: signup_response.confirmation_sent_at.is_some(),
            message: "Please check your email to confirm your account.".to_string(),
            profile,
        };
        return Ok(Created(DataResponse::new(serde_json::to_value(pending)?)));
    }

    Err(ApiError::internal(
        "Failed to parse auth response: unexpected format",
    ))
}

/// POST /auth/signout
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> impl IntoResponse {
    // Best effort; a failed provider logout is not surfaced
    let _ = state
        .http_client
        .post(format!("{}/auth/v1/logout", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .header("Authorization", format!("Bearer {}", auth.token()))
        .send()
        .await;

    StatusCode::NO_CONTENT
}

/// GET /auth/session
///
/// Current session info, with the user record re-fetched from the provider.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> ApiResult<Json<DataResponse<SessionResponse>>> {
    let response = state
        .http_client
        .get(format!("{}/auth/v1/user", state.settings.supabase_url))
        .header("apikey", &state.settings.supabase_anon_key)
        .header("Authorization", format!("Bearer {}", auth.token()))
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch user: {}", e)))?;

    if !response.status().is_success() {
        return Err(ApiError::unauthorized("Invalid session"));
    }

    let provider_user: ProviderUser = response
        .json()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to parse user response: {}", e)))?;

    let session = SessionResponse {
        user: provider_user.into(),
        access_token: auth.token().to_string(),
        expires_at: auth.claims().exp,
    };

    Ok(Json(DataResponse::new(session)))
}
