//! Bearer extraction.
//!
//! The caller's upstream API key arrives as `Authorization: Bearer <key>`.
//! Extraction never rejects: a missing key produces a context without a
//! credential, and the first picker call fails with 401 before any upstream
//! request is made.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use dam_client::{Credential, RequestContext};
use tracing::warn;

use crate::middleware::CorrelationId;

/// Per-request context built from the inbound headers.
#[derive(Debug)]
pub struct Caller(pub RequestContext);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credential = match parts.headers.get(AUTHORIZATION) {
            None => {
                warn!("no Authorization header on request");
                None
            }
            Some(value) => {
                let credential = value.to_str().ok().and_then(Credential::from_bearer);
                if credential.is_none() {
                    warn!("Authorization header is not a usable bearer token");
                }
                credential
            }
        };

        let mut ctx = RequestContext::new(credential);
        if let Some(CorrelationId(id)) = parts.extensions.get::<CorrelationId>() {
            ctx = ctx.with_correlation_id(id.clone());
        }
        Ok(Caller(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RequestContext {
        let (mut parts, _) = request.into_parts();
        let Caller(ctx) = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn bearer_becomes_credential() {
        let ctx = extract(
            Request::builder()
                .header(AUTHORIZATION, "Bearer key-123")
                .body(())
                .unwrap(),
        )
        .await;

        assert_eq!(ctx.credential().unwrap().expose(), "key-123");
    }

    #[tokio::test]
    async fn missing_or_malformed_header_leaves_no_credential() {
        let ctx = extract(Request::builder().body(()).unwrap()).await;
        assert!(ctx.credential().is_err());

        let ctx = extract(
            Request::builder()
                .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(())
                .unwrap(),
        )
        .await;
        assert!(ctx.credential().is_err());
    }

    #[tokio::test]
    async fn correlation_id_is_carried() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(CorrelationId("corr-1".to_string()));

        let ctx = extract(request).await;
        assert_eq!(ctx.correlation_id(), Some("corr-1"));
    }
}
