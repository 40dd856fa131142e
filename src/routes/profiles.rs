//! Profile routes
//!
//! Public profile view plus the authenticated edit surface (field updates,
//! avatar and gallery uploads).

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::{OptionalAuth, RequireAuth};
use crate::domain::auth::SignUpRequest;
use crate::domain::profiles::{
    append_gallery, ProfileDetail, PublicProfileResponse, UpdateProfileRequest,
};
use crate::domain::search;
use crate::error::{ApiError, ApiResult};

/// Database row for a full profile
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    username: String,
    email: String,
    role: Option<String>,
    about: Option<String>,
    rating: i32,
    avatar_url: Option<String>,
    gallery_urls: Option<Vec<String>>,
    phone: Option<String>,
    website: Option<String>,
    instagram: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileDetail {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            about: row.about,
            rating: row.rating,
            avatar_url: row.avatar_url,
            gallery_urls: row.gallery_urls.unwrap_or_default(),
            phone: row.phone,
            website: row.website,
            instagram: row.instagram,
            created_at: row.created_at,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, username, email, role, about, rating, avatar_url, \
                               gallery_urls, phone, website, instagram, created_at";

/// Create the profile row for a freshly issued auth identity. Rating starts
/// at zero; `username` must already be in slug form.
pub(crate) async fn insert_profile(
    state: &AppState,
    user_id: Uuid,
    username: &str,
    req: &SignUpRequest,
) -> ApiResult<ProfileDetail> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        INSERT INTO profiles (id, username, email, role, about, rating, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, NOW())
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(username)
    .bind(&req.email)
    .bind(&req.role)
    .bind(&req.about)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict("Username already taken")
        }
        _ => ApiError::Database(e),
    })?;

    tracing::info!(user_id = %user_id, username = username, "Profile created");

    Ok(row.into())
}

/// GET /profiles/:username
///
/// Public profile view. The requested name is slugified before lookup so
/// `/profiles/Jane Doe` finds `jane-doe`. A valid bearer token belonging to
/// the profile's owner flips `is_owner`, which drives the owner-only avatar
/// upload affordance.
pub async fn get_profile_by_username(
    State(state): State<Arc<AppState>>,
    auth: OptionalAuth,
    Path(username): Path<String>,
) -> ApiResult<Json<DataResponse<PublicProfileResponse>>> {
    let normalized = search::normalize_username(&username);

    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE username = $1"
    ))
    .bind(&normalized)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Profile not found."))?;

    let profile: ProfileDetail = row.into();
    let is_owner = auth
        .0
        .map(|ctx| ctx.user_id == profile.id)
        .unwrap_or(false);

    Ok(Json(DataResponse::new(PublicProfileResponse {
        profile,
        is_owner,
    })))
}

/// GET /profiles/me
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> ApiResult<Json<DataResponse<ProfileDetail>>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Profile not found."))?;

    Ok(Json(DataResponse::new(row.into())))
}

/// PUT /profiles/me
///
/// Update a subset of the caller's editable fields. Gallery removals arrive
/// here as the full remaining list (staged client-side, persisted on save).
/// Concurrent edits are last-write-wins at the store.
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<DataResponse<ProfileDetail>>> {
    let username = req
        .username
        .as_deref()
        .map(search::normalize_username)
        .filter(|u| !u.is_empty());

    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        UPDATE profiles SET
            username = COALESCE($2, username),
            phone = COALESCE($3, phone),
            about = COALESCE($4, about),
            website = COALESCE($5, website),
            instagram = COALESCE($6, instagram),
            avatar_url = COALESCE($7, avatar_url),
            gallery_urls = COALESCE($8, gallery_urls)
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    ))
    .bind(auth.user_id)
    .bind(&username)
    .bind(&req.phone)
    .bind(&req.about)
    .bind(&req.website)
    .bind(&req.instagram)
    .bind(&req.avatar_url)
    .bind(&req.gallery_urls)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::conflict("Username already taken")
        }
        _ => ApiError::Database(e),
    })?
    .ok_or_else(|| ApiError::not_found("Profile not found."))?;

    tracing::info!(user_id = %auth.user_id, "Profile updated");

    Ok(Json(DataResponse::new(row.into())))
}

#[derive(Debug, Serialize)]
pub struct AvatarUploadResponse {
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
pub struct GalleryUploadResponse {
    pub gallery_urls: Vec<String>,
    pub added_urls: Vec<String>,
}

/// An uploaded file pulled out of a multipart body
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    bytes: axum::body::Bytes,
}

/// Drain the multipart body, keeping fields that carry a file.
async fn collect_files(mut multipart: Multipart) -> ApiResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        files.push(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Ok(files)
}

/// POST /profiles/me/avatar
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    multipart: Multipart,
) -> ApiResult<Json<DataResponse<AvatarUploadResponse>>> {
    let file = collect_files(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let key = state
        .storage
        .upload(
            &state.settings.avatar_bucket,
            &file.filename,
            file.content_type.as_deref(),
            file.bytes,
        )
        .await?;
    let avatar_url = state
        .storage
        .public_url(&state.settings.avatar_bucket, &key);

    let updated = sqlx::query("UPDATE profiles SET avatar_url = $2 WHERE id = $1")
        .bind(auth.user_id)
        .bind(&avatar_url)
        .execute(&state.db)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Profile not found."));
    }

    tracing::info!(user_id = %auth.user_id, "Avatar updated");

    Ok(Json(DataResponse::new(AvatarUploadResponse { avatar_url })))
}

/// POST /profiles/me/gallery
///
/// Uploads run one at a time in submission order; the resulting URLs are
/// appended after the existing gallery entries.
pub async fn upload_gallery(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
    multipart: Multipart,
) -> ApiResult<Json<DataResponse<GalleryUploadResponse>>> {
    let files = collect_files(multipart).await?;
    if files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    let mut added_urls = Vec::with_capacity(files.len());
    for file in files {
        let key = state
            .storage
            .upload(
                &state.settings.gallery_bucket,
                &file.filename,
                file.content_type.as_deref(),
                file.bytes,
            )
            .await?;
        added_urls.push(
            state
                .storage
                .public_url(&state.settings.gallery_bucket, &key),
        );
    }

    // Read-modify-write, matching the edit form's save flow. Concurrent
    // saves are last-write-wins.
    let existing: Vec<String> =
        sqlx::query_scalar("SELECT gallery_urls FROM profiles WHERE id = $1")
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found."))?;

    let gallery_urls = append_gallery(existing, &added_urls);

    sqlx::query("UPDATE profiles SET gallery_urls = $2 WHERE id = $1")
        .bind(auth.user_id)
        .bind(&gallery_urls)
        .execute(&state.db)
        .await?;

    tracing::info!(
        user_id = %auth.user_id,
        added = added_urls.len(),
        total = gallery_urls.len(),
        "Gallery images added"
    );

    Ok(Json(DataResponse::new(GalleryUploadResponse {
        gallery_urls,
        added_urls,
    })))
}
