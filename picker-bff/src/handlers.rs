//! Axum HTTP handlers for the picker API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use dam_client::models::{AssetDetail, AssetThumbnail, CollectionNode, PagedResult};
use tracing::info;

use crate::{
    auth::Caller,
    error::ApiError,
    models::{HealthResponse, PageParams, SearchParams},
    AppState,
};

// ------------------------------------------------------------------ //
//  GET /health                                                        //
// ------------------------------------------------------------------ //

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::now())
}

// ------------------------------------------------------------------ //
//  Assets                                                             //
// ------------------------------------------------------------------ //

/// `GET /api/assets/search?query&page&pageSize`
pub async fn search_assets(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Query(params): Query<SearchParams>,
) -> Result<Json<PagedResult<AssetThumbnail>>, ApiError> {
    let (page, page_size) = state.paging.clamp(params.page, params.page_size);
    let query = params.query.unwrap_or_default();

    let result = state.picker.search(&ctx, &query, page, page_size).await?;
    info!(
        page,
        page_size,
        returned = result.items.len(),
        "GET /api/assets/search processed"
    );
    Ok(Json(result))
}

/// `GET /api/assets/:asset_id`
pub async fn get_asset_detail(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(asset_id): Path<String>,
) -> Result<Json<AssetDetail>, ApiError> {
    let id = parse_id(&asset_id, "asset")?;

    state
        .picker
        .asset_detail(&ctx, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Asset with ID '{asset_id}' not found")))
}

// ------------------------------------------------------------------ //
//  Collections                                                        //
// ------------------------------------------------------------------ //

/// `GET /api/collections`
pub async fn root_collections(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
) -> Result<Json<Vec<CollectionNode>>, ApiError> {
    Ok(Json(state.picker.featured_collections(&ctx, 0).await?))
}

/// `GET /api/collections/:collection_id/children`
pub async fn collection_children(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(collection_id): Path<String>,
) -> Result<Json<Vec<CollectionNode>>, ApiError> {
    let id = parse_id(&collection_id, "collection")?;
    if id < 1 {
        return Err(ApiError::BadRequest(format!(
            "Invalid collection ID '{collection_id}'"
        )));
    }

    Ok(Json(state.picker.featured_collections(&ctx, id).await?))
}

/// `GET /api/collections/:collection_id/assets?page&pageSize`
pub async fn collection_assets(
    State(state): State<Arc<AppState>>,
    Caller(ctx): Caller,
    Path(collection_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<PagedResult<AssetThumbnail>>, ApiError> {
    let id = parse_id(&collection_id, "collection")?;
    let (page, page_size) = state.paging.clamp(params.page, params.page_size);

    let result = state
        .picker
        .collection_assets(&ctx, id, page, page_size)
        .await?;
    Ok(Json(result))
}

fn parse_id(raw: &str, kind: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {kind} ID '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42", "asset").unwrap(), 42);
        assert_eq!(parse_id(" 7 ", "asset").unwrap(), 7);
        assert!(matches!(parse_id("abc", "asset"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_id("1.5", "asset"), Err(ApiError::BadRequest(_))));
    }
}
