//! Query-string and response shapes owned by the HTTP layer.
//!
//! Picker payloads (`PagedResult`, `AssetDetail`, `CollectionNode`) come
//! straight from `dam_client::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------ //
//  Inbound                                                            //
// ------------------------------------------------------------------ //

/// `GET /api/assets/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<i64>,
}

/// Paging for listings without a free-text query.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default, rename = "pageSize")]
    pub page_size: Option<i64>,
}

// ------------------------------------------------------------------ //
//  Outbound                                                           //
// ------------------------------------------------------------------ //

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
