//! Directory search route.
//!
//! Loads every profile summary on each request, derives tags, and filters
//! them against the free-text query. A blank query reports no active search,
//! which the client renders as no results section at all.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::profiles::{DirectoryEntry, DirectoryResponse, ProfileSummary};
use crate::domain::search::{self, SearchQuery};

#[derive(Debug, Deserialize)]
pub struct DirectoryParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    username: String,
    about: Option<String>,
}

/// GET /profiles?q=
pub async fn search_profiles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectoryParams>,
) -> Json<DirectoryResponse> {
    let query = match params.q.as_deref().and_then(SearchQuery::parse) {
        Some(q) => q,
        None => return Json(DirectoryResponse::inactive()),
    };

    // A load failure degrades to an empty candidate set: the client shows
    // "no profiles found" and the detail stays in the logs.
    let rows = match sqlx::query_as::<_, SummaryRow>("SELECT username, about FROM profiles")
        .fetch_all(&state.db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Directory load failed, returning empty result set");
            Vec::new()
        }
    };

    let candidates: Vec<ProfileSummary> = rows
        .into_iter()
        .map(|row| ProfileSummary::new(row.username, row.about))
        .collect();

    let results = search::filter(&candidates, &query)
        .into_iter()
        .map(|profile| DirectoryEntry {
            username: profile.username.clone(),
            display_name: search::highlight(&profile.display_name(), &query),
            tags: profile
                .tags
                .iter()
                .map(|tag| search::highlight(tag, &query))
                .collect(),
        })
        .collect();

    Json(DirectoryResponse {
        search_active: true,
        results,
    })
}
