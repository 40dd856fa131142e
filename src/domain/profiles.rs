//! Profile domain types
//!
//! Directory entries for event professionals. The summary shape feeds the
//! search pipeline; the detail shape backs the public profile and edit views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::search::{self, Segment};

/// Lightweight directory entry: what the search pipeline operates on.
/// Tags are derived from the bio at load time and never stored.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub username: String,
    pub about: Option<String>,
    pub tags: Vec<String>,
}

impl ProfileSummary {
    pub fn new(username: String, about: Option<String>) -> Self {
        let tags = search::derive_tags(about.as_deref());
        Self {
            username,
            about,
            tags,
        }
    }

    /// Human-readable form of the slug, hyphens replaced with spaces.
    pub fn display_name(&self) -> String {
        self.username.replace('-', " ")
    }
}

/// Full profile row
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDetail {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Option<String>,
    pub about: Option<String>,
    pub rating: i32,
    pub avatar_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for updating the caller's own profile. Absent fields are left
/// untouched; `gallery_urls` replaces the stored list wholesale, which is how
/// staged gallery removals become persistent on save.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub gallery_urls: Option<Vec<String>>,
}

/// Append freshly uploaded gallery URLs after the existing entries,
/// preserving their order.
pub fn append_gallery(existing: Vec<String>, added: &[String]) -> Vec<String> {
    let mut all = existing;
    all.extend(added.iter().cloned());
    all
}

/// Public profile view, with an ownership flag for the owner-only upload
/// affordance.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileDetail,
    pub is_owner: bool,
}

/// One search hit: slug plus highlighted display name and tags.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub username: String,
    pub display_name: Vec<Segment>,
    pub tags: Vec<Vec<Segment>>,
}

/// Directory search result. `search_active: false` (blank query) is a
/// distinct state from an active search with zero matches.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryResponse {
    pub search_active: bool,
    pub results: Vec<DirectoryEntry>,
}

impl DirectoryResponse {
    pub fn inactive() -> Self {
        Self {
            search_active: false,
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_derives_tags_from_bio() {
        let p = ProfileSummary::new("jane-doe".into(), Some("Wedding Planner".into()));
        assert_eq!(p.tags, vec!["wedding", "planner"]);
    }

    #[test]
    fn summary_without_bio_has_no_tags() {
        let p = ProfileSummary::new("bob-dj".into(), None);
        assert!(p.tags.is_empty());
    }

    #[test]
    fn gallery_append_preserves_prior_order() {
        let existing = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let added = vec!["c.jpg".to_string(), "d.jpg".to_string()];
        assert_eq!(
            append_gallery(existing, &added),
            vec!["a.jpg", "b.jpg", "c.jpg", "d.jpg"]
        );
    }

    #[test]
    fn display_name_unhyphenates() {
        let p = ProfileSummary::new("jane-doe-photography".into(), None);
        assert_eq!(p.display_name(), "jane doe photography");
    }
}
