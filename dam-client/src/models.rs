//! Output shapes handed to the picker front end.

use serde::Serialize;

/// One asset tile in a search or collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetThumbnail {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    /// Human-readable `"<w> x <h>"`.
    pub dimensions: Option<String>,
    pub file_extension: Option<String>,
    pub resource_type: Option<String>,
}

/// A featured collection in the lazily expanded tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub id: String,
    pub name: String,
    pub has_resources: bool,
    pub has_children: bool,
    pub selectable: bool,
}

impl CollectionNode {
    pub fn new(id: String, name: String, has_resources: bool, has_children: bool) -> Self {
        Self {
            id,
            name,
            has_resources,
            has_children,
            selectable: is_selectable(has_resources, has_children),
        }
    }
}

/// A node can be picked when it holds resources, or when it is an empty
/// leaf. A branch with children but no resources of its own cannot.
pub fn is_selectable(has_resources: bool, has_children: bool) -> bool {
    has_resources || !has_children
}

/// Everything the editor needs to embed one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub file_extension: Option<String>,
    pub mime_type: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: i64,
    pub height: i64,
}

/// One page of results.
///
/// `total_count` is an estimate for listings; see
/// [`crate::picker::estimate_total`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = if page_size > 0 {
            total_count.div_ceil(u64::from(page_size))
        } else {
            0
        };
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            has_next_page: u64::from(page) < total_pages,
            has_previous_page: page > 1,
        }
    }

    pub fn empty(page: u32, page_size: u32) -> Self {
        Self::new(Vec::new(), page, page_size, 0)
    }
}
