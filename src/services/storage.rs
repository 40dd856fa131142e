//! Object storage client for the hosted Storage API.
//!
//! Uploads profile images (avatars, gallery) and derives their public URLs.
//! Object keys are `<epoch-millis>-<original-filename>` and upserts are
//! disabled, so a key collision is rejected by the service rather than
//! overwriting. Uploads are single attempts; callers re-try manually.

use anyhow::{Context, Result};
use axum::body::Bytes;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::error::ApiError;

#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    base_url: Url,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid storage base URL")?;

        tracing::info!(base_url = %base_url, "Storage client initialized");

        Ok(Self {
            client,
            base_url,
            service_key: service_key.to_string(),
        })
    }

    /// Collision-avoiding object key for an uploaded file.
    pub fn object_key(filename: &str, epoch_millis: i64) -> String {
        format!("{}-{}", epoch_millis, filename)
    }

    /// Upload one object and return its key within the bucket.
    pub async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, ApiError> {
        let key = Self::object_key(filename, Utc::now().timestamp_millis());

        let url = self
            .base_url
            .join(&format!("storage/v1/object/{}/{}", bucket, key))
            .map_err(|e| ApiError::internal(format!("Invalid object path: {}", e)))?;

        tracing::debug!(bucket = bucket, key = %key, size = bytes.len(), "Uploading object");

        let mut req = self
            .client
            .post(url)
            .bearer_auth(&self.service_key)
            .header("cache-control", "3600")
            .header("x-upsert", "false");

        if let Some(ct) = content_type {
            req = req.header("Content-Type", ct.to_string());
        }

        let response = req.body(bytes).send().await.map_err(|e| {
            tracing::error!(error = %e, bucket = bucket, "Storage upload failed");
            ApiError::internal(format!("Storage service unavailable: {}", e))
        })?;

        match response.status() {
            s if s.is_success() => Ok(key),
            StatusCode::CONFLICT => Err(ApiError::conflict("An object with this key already exists")),
            s => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(status = %s, body = %body, "Storage upload rejected");
                Err(ApiError::internal(format!("Storage upload failed: {}", s)))
            }
        }
    }

    /// Public URL for a stored object.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        let mut url = self.base_url.clone();
        // Url::join would misread key segments containing '#' or '?', so
        // build the path through the segment API instead.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object", "public", bucket, key]);
        }
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_prefixes_epoch_millis() {
        assert_eq!(
            StorageClient::object_key("venue.jpg", 1724800000000),
            "1724800000000-venue.jpg"
        );
    }

    #[test]
    fn public_url_points_into_the_public_namespace() {
        let client = StorageClient::new("https://example.supabase.co", "key", 30).unwrap();
        assert_eq!(
            client.public_url("avatars", "1724800000000-me.png"),
            "https://example.supabase.co/storage/v1/object/public/avatars/1724800000000-me.png"
        );
    }

    #[test]
    fn public_url_escapes_awkward_filenames() {
        let client = StorageClient::new("https://example.supabase.co", "key", 30).unwrap();
        let url = client.public_url("gallery", "1724800000000-my photo.jpg");
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/public/gallery/1724800000000-my%20photo.jpg"
        );
    }
}
