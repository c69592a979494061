//! Per-run request context.

use serde::{Deserialize, Serialize};

/// Process-scoped identity of one pipeline run.
///
/// Every upload for the run is grouped under `asset_namespace`, which is
/// exclusive to the run.
///
/// # Examples
///
/// ```
/// use reelsmith_core::RequestContext;
///
/// let ctx = RequestContext::with_id("veo-product-videos", "1700000000_abcd1234");
/// assert_eq!(ctx.asset_namespace(), "veo-product-videos/1700000000_abcd1234");
/// assert_eq!(ctx.segments_folder(), "veo-product-videos/1700000000_abcd1234/segments");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct RequestContext {
    /// `{unix_seconds}_{8 hex chars}`
    request_id: String,
    /// `{prefix}/{request_id}`
    asset_namespace: String,
}

impl RequestContext {
    /// Generate a fresh context from the current time and a random suffix.
    pub fn generate(prefix: &str) -> Self {
        let timestamp = chrono::Utc::now().timestamp();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let request_id = format!("{}_{}", timestamp, &suffix[..8]);
        let ctx = Self::with_id(prefix, request_id);
        tracing::debug!(request_id = %ctx.request_id, namespace = %ctx.asset_namespace, "Generated request context");
        ctx
    }

    /// Build a context around a known request id.
    pub fn with_id(prefix: &str, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        let prefix = prefix.trim_end_matches('/');
        let asset_namespace = if prefix.is_empty() {
            request_id.clone()
        } else {
            format!("{}/{}", prefix, request_id)
        };
        Self {
            request_id,
            asset_namespace,
        }
    }

    /// Folder holding uploaded product images.
    pub fn input_images_folder(&self) -> String {
        format!("{}/input_images", self.asset_namespace)
    }

    /// Folder holding generated segments.
    pub fn segments_folder(&self) -> String {
        format!("{}/segments", self.asset_namespace)
    }
}
