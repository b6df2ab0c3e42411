//! The four operations behind the asset picker.
//!
//! Each operation resolves the caller's credential from the
//! [`RequestContext`] before touching the network, so a request without an
//! API key fails with [`ClientError::Unauthenticated`] and sends nothing
//! upstream.

use std::time::Instant;

use tracing::{info, warn};

use crate::credential::RequestContext;
use crate::enrich::{enrich, title_or_fallback, THUMBNAIL_SIZE};
use crate::error::ClientError;
use crate::gateway::Gateway;
use crate::mime;
use crate::models::{AssetDetail, AssetThumbnail, CollectionNode, Dimensions, PagedResult};
use crate::upstream::{Collection, Resource, ResourceData};

pub const FN_DO_SEARCH: &str = "do_search";
pub const FN_GET_FEATURED_COLLECTIONS: &str = "get_featured_collections";
pub const FN_GET_RESOURCE_DATA: &str = "get_resource_data";

/// Size token for the original file.
pub const ORIGINAL_SIZE: &str = "";

#[derive(Clone)]
pub struct Picker {
    gateway: Gateway,
}

impl Picker {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Free-text search ordered by relevance.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<AssetThumbnail>, ClientError> {
        info!(
            correlation_id = ctx.correlation_id().unwrap_or_default(),
            query,
            page,
            page_size,
            "asset search starting"
        );
        self.listing(
            ctx,
            query,
            &[("order_by", "relevance"), ("sort", "desc")],
            page,
            page_size,
        )
        .await
    }

    /// Featured collections directly under `parent` (0 is the root).
    pub async fn featured_collections(
        &self,
        ctx: &RequestContext,
        parent: i64,
    ) -> Result<Vec<CollectionNode>, ClientError> {
        let credential = ctx.credential()?;
        let started = Instant::now();
        let parent_param = parent.to_string();

        let collections: Vec<Collection> = self
            .gateway
            .call(credential, FN_GET_FEATURED_COLLECTIONS, &[("parent", parent_param.as_str())])
            .await?
            .unwrap_or_default();

        let nodes: Vec<CollectionNode> = collections.into_iter().map(to_node).collect();
        info!(
            correlation_id = ctx.correlation_id().unwrap_or_default(),
            parent,
            count = nodes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "featured collections fetched"
        );
        Ok(nodes)
    }

    /// Assets filed in one collection.
    pub async fn collection_assets(
        &self,
        ctx: &RequestContext,
        collection_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<AssetThumbnail>, ClientError> {
        info!(
            correlation_id = ctx.correlation_id().unwrap_or_default(),
            collection_id,
            page,
            page_size,
            "collection assets starting"
        );
        let filter = collection_filter(collection_id);
        self.listing(ctx, &filter, &[], page, page_size).await
    }

    /// Metadata and original-file URL for one asset; `None` when the
    /// upstream does not know it.
    pub async fn asset_detail(
        &self,
        ctx: &RequestContext,
        asset_id: i64,
    ) -> Result<Option<AssetDetail>, ClientError> {
        let credential = ctx.credential()?;
        let started = Instant::now();
        let resource_param = asset_id.to_string();

        let data: Option<ResourceData> = self
            .gateway
            .call(credential, FN_GET_RESOURCE_DATA, &[("resource", resource_param.as_str())])
            .await?;
        let Some(data) = data else {
            warn!(
                correlation_id = ctx.correlation_id().unwrap_or_default(),
                asset_id,
                "asset not found"
            );
            return Ok(None);
        };

        let url = self
            .gateway
            .resource_path(credential, asset_id, ORIGINAL_SIZE)
            .await?;

        let detail = to_detail(data, url);
        info!(
            correlation_id = ctx.correlation_id().unwrap_or_default(),
            asset_id,
            title = %detail.title,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "asset detail fetched"
        );
        Ok(Some(detail))
    }

    async fn listing(
        &self,
        ctx: &RequestContext,
        search: &str,
        extra: &[(&str, &str)],
        page: u32,
        page_size: u32,
    ) -> Result<PagedResult<AssetThumbnail>, ClientError> {
        let credential = ctx.credential()?;
        let started = Instant::now();

        let fetchrows = page_size.to_string();
        let offset = (u64::from(page.saturating_sub(1)) * u64::from(page_size)).to_string();
        let mut params = vec![
            ("search", search),
            ("fetchrows", fetchrows.as_str()),
            ("offset", offset.as_str()),
        ];
        params.extend_from_slice(extra);

        let rows: Vec<Resource> = self
            .gateway
            .call(credential, FN_DO_SEARCH, &params)
            .await?
            .unwrap_or_default();

        if rows.is_empty() {
            info!(
                correlation_id = ctx.correlation_id().unwrap_or_default(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "listing returned no rows"
            );
            return Ok(PagedResult::empty(page, page_size));
        }

        let items = enrich(&self.gateway, credential, &rows, THUMBNAIL_SIZE).await;
        let total = estimate_total(page, page_size, rows.len());
        info!(
            correlation_id = ctx.correlation_id().unwrap_or_default(),
            count = items.len(),
            total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "listing completed"
        );
        Ok(PagedResult::new(items, page, page_size, total))
    }
}

/// Search expression selecting the members of one collection.
pub fn collection_filter(collection_id: i64) -> String {
    format!("!collection{collection_id}")
}

/// Total-count estimate without a second count query.
///
/// A full page reports one more than has been seen so far, which is enough
/// for the UI to offer a next page; a short page is the last one and is
/// exact.
pub fn estimate_total(page: u32, page_size: u32, rows: usize) -> u64 {
    let page = u64::from(page);
    let page_size = u64::from(page_size);
    let rows = rows as u64;
    if rows >= page_size {
        page * page_size + 1
    } else {
        page.saturating_sub(1) * page_size + rows
    }
}

fn to_node(c: Collection) -> CollectionNode {
    let name = match c.name {
        Some(n) if !n.trim().is_empty() => n,
        _ => format!("Collection {}", c.reference),
    };
    CollectionNode::new(c.reference.to_string(), name, c.has_resources, c.has_children)
}

fn to_detail(data: ResourceData, url: Option<String>) -> AssetDetail {
    // Each axis falls back to the thumbnail on its own.
    let dimensions = match (
        data.width.or(data.thumb_width),
        data.height.or(data.thumb_height),
    ) {
        (Some(width), Some(height)) => Some(Dimensions { width, height }),
        _ => None,
    };
    AssetDetail {
        id: data.reference.to_string(),
        title: title_or_fallback(data.title.as_deref(), data.reference),
        url,
        mime_type: mime::from_extension(data.file_extension.as_deref()),
        file_extension: data.file_extension,
        dimensions,
        file_size: data.file_size,
    }
}
