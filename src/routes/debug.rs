//! Diagnostic listing of every profile row. Handy when checking what the
//! backing store actually holds; not linked from any user-facing flow.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::error::ApiResult;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProfileListing {
    pub username: String,
    pub role: Option<String>,
}

/// GET /debug/profiles
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<Vec<ProfileListing>>>> {
    let listings = sqlx::query_as::<_, ProfileListing>(
        "SELECT username, role FROM profiles ORDER BY created_at",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(listings)))
}
