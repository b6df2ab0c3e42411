//! Error type shared by the gateway and the picker facade.

use thiserror::Error;

/// Longest upstream body excerpt kept on a status error.
pub const EXCERPT_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("upstream API key is required; send it as `Authorization: Bearer <api_key>`")]
    Unauthenticated,
    #[error("upstream `{function}` returned status {status}: {excerpt}")]
    Upstream {
        function: String,
        status: u16,
        excerpt: String,
    },
    #[error("upstream `{function}` request failed: {message}")]
    Transport { function: String, message: String },
    #[error("upstream `{function}` returned an unexpected shape: {source}")]
    Decode {
        function: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Cut `body` down to at most [`EXCERPT_LIMIT`] characters.
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(EXCERPT_LIMIT) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}
