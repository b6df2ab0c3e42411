//! Thumbnail enrichment for listings.
//!
//! A page of resources gets its thumbnail URLs from exactly one batched
//! path lookup, however many rows the page holds.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::credential::Credential;
use crate::gateway::Gateway;
use crate::models::AssetThumbnail;
use crate::upstream::Resource;

/// Size token for list thumbnails.
pub const THUMBNAIL_SIZE: &str = "thm";

/// Attach thumbnail URLs to `resources`, keeping their order.
pub async fn enrich(
    gateway: &Gateway,
    credential: &Credential,
    resources: &[Resource],
    size: &str,
) -> Vec<AssetThumbnail> {
    let started = Instant::now();
    let ids: Vec<i64> = resources.iter().map(|r| r.reference).collect();
    let urls = gateway.batch_resource_paths(credential, &ids, size).await;

    let items = assemble(resources, &urls);
    debug!(
        count = items.len(),
        with_thumbnail = urls.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "thumbnail enrichment completed"
    );
    items
}

/// Join resources with a ref-to-URL map. Missing entries give no thumbnail.
pub fn assemble(resources: &[Resource], urls: &HashMap<i64, String>) -> Vec<AssetThumbnail> {
    resources
        .iter()
        .map(|r| to_thumbnail(r, urls.get(&r.reference).cloned()))
        .collect()
}

fn to_thumbnail(resource: &Resource, thumbnail_url: Option<String>) -> AssetThumbnail {
    let dimensions = match (resource.thumb_width, resource.thumb_height) {
        (Some(w), Some(h)) => Some(format!("{w} x {h}")),
        _ => None,
    };
    AssetThumbnail {
        id: resource.reference.to_string(),
        title: title_or_fallback(resource.title.as_deref(), resource.reference),
        thumbnail_url,
        dimensions,
        file_extension: resource.file_extension.clone(),
        resource_type: resource.resource_type.map(|t| t.to_string()),
    }
}

pub(crate) fn title_or_fallback(title: Option<&str>, reference: i64) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => format!("Resource {reference}"),
    }
}
