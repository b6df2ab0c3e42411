//! Signed calls against the upstream function API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::credential::Credential;
use crate::error::{excerpt, ClientError};
use crate::signature;
use crate::transport::UpstreamTransport;

pub const FN_GET_RESOURCE_PATH: &str = "get_resource_path";

/// Where and as whom to call the upstream.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub base_url: String,
    pub user: String,
}

#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn UpstreamTransport>,
    options: GatewayOptions,
}

impl Gateway {
    pub fn new(transport: Arc<dyn UpstreamTransport>, options: GatewayOptions) -> Self {
        Self { transport, options }
    }

    /// Call `function` and decode its JSON body.
    ///
    /// An empty body, `false` or `null` means "no result" and yields `None`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        function: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>, ClientError> {
        let url = signature::signed_url(
            &self.options.base_url,
            &self.options.user,
            credential.expose(),
            function,
            params,
        );
        let body = self.fetch(function, &url, params.len()).await?;
        if is_absent(&body) {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| {
                error!(function, error = %source, "upstream response did not decode");
                ClientError::Decode {
                    function: function.to_string(),
                    source,
                }
            })
    }

    /// Path of one resource at `size` (empty size means the original file).
    pub async fn resource_path(
        &self,
        credential: &Credential,
        reference: i64,
        size: &str,
    ) -> Result<Option<String>, ClientError> {
        let reference = reference.to_string();
        let params = [
            ("ref", reference.as_str()),
            ("getfilepath", "false"),
            ("size", size),
        ];
        let url = signature::signed_url(
            &self.options.base_url,
            &self.options.user,
            credential.expose(),
            FN_GET_RESOURCE_PATH,
            &params,
        );
        let body = self.fetch(FN_GET_RESOURCE_PATH, &url, params.len()).await?;
        Ok(unquote_url(&body))
    }

    /// Paths of many resources in one round trip.
    ///
    /// Best effort: any failure is logged and yields an empty map. Refs
    /// without a usable path are simply absent.
    pub async fn batch_resource_paths(
        &self,
        credential: &Credential,
        ids: &[i64],
        size: &str,
    ) -> HashMap<i64, String> {
        if ids.is_empty() {
            return HashMap::new();
        }

        let refs = signature::ids_as_json_array(ids);
        let params = [
            ("ref", refs.as_str()),
            ("getfilepath", "false"),
            ("size", size),
        ];
        // Brackets must reach the upstream literally, so sign and send raw.
        let url = signature::signed_url_raw(
            &self.options.base_url,
            &self.options.user,
            credential.expose(),
            FN_GET_RESOURCE_PATH,
            &params,
        );

        let body = match self.fetch(FN_GET_RESOURCE_PATH, &url, params.len()).await {
            Ok(body) => body,
            Err(e) => {
                warn!(count = ids.len(), size, error = %e, "batch path lookup failed");
                return HashMap::new();
            }
        };

        match PathLookup::sniff(&body) {
            Ok(lookup) => {
                let paths = lookup.into_paths(ids);
                debug!(found = paths.len(), requested = ids.len(), "batch path lookup parsed");
                paths
            }
            Err(e) => {
                warn!(count = ids.len(), size, error = %e, "batch path lookup unreadable");
                HashMap::new()
            }
        }
    }

    async fn fetch(
        &self,
        function: &str,
        url: &str,
        param_count: usize,
    ) -> Result<String, ClientError> {
        let started = Instant::now();
        debug!(function, param_count, "upstream call starting");

        let resp = self.transport.get(url).await.map_err(|e| {
            error!(function, error = %e, elapsed_ms = started.elapsed().as_millis() as u64, "upstream call failed");
            ClientError::Transport {
                function: function.to_string(),
                message: e.to_string(),
            }
        })?;

        if !resp.is_success() {
            let excerpt = excerpt(&resp.body);
            error!(
                function,
                status = resp.status,
                response = %excerpt,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "upstream returned an error status"
            );
            return Err(ClientError::Upstream {
                function: function.to_string(),
                status: resp.status,
                excerpt,
            });
        }

        debug!(
            function,
            response_len = resp.body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upstream call completed"
        );
        Ok(resp.body)
    }
}

// ------------------------------------------------------------------ //
//  Response shapes                                                    //
// ------------------------------------------------------------------ //

/// The upstream's "nothing here" bodies.
pub fn is_absent(body: &str) -> bool {
    matches!(body.trim(), "" | "false" | "null")
}

/// Decoded `get_resource_path` body. A single requested ref comes back as a
/// bare (often quoted) URL, several refs as an object keyed by ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLookup {
    Empty,
    SingleUrl(String),
    UrlMap(HashMap<i64, String>),
}

impl PathLookup {
    /// Classify `body` by its first non-blank character.
    pub fn sniff(body: &str) -> Result<Self, serde_json::Error> {
        let trimmed = body.trim();
        if is_absent(trimmed) {
            return Ok(Self::Empty);
        }
        if trimmed.starts_with('{') {
            let raw: HashMap<String, serde_json::Value> = serde_json::from_str(trimmed)?;
            let map = raw
                .into_iter()
                .filter_map(|(key, value)| {
                    let id = key.trim().parse::<i64>().ok()?;
                    let url = value.as_str().and_then(usable_url)?;
                    Some((id, url))
                })
                .collect();
            return Ok(Self::UrlMap(map));
        }
        Ok(unquote_url(trimmed).map_or(Self::Empty, Self::SingleUrl))
    }

    /// Resolve against the refs that were asked for.
    pub fn into_paths(self, requested: &[i64]) -> HashMap<i64, String> {
        match self {
            Self::Empty => HashMap::new(),
            Self::UrlMap(map) => map,
            Self::SingleUrl(url) => match requested {
                [only] => HashMap::from([(*only, url)]),
                _ => {
                    warn!(requested = requested.len(), "bare path returned for a multi-ref lookup; ignoring");
                    HashMap::new()
                }
            },
        }
    }
}

/// Strip quoting from a bare URL body; `None` for empty or `false`.
fn unquote_url(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let unquoted = if trimmed.starts_with('"') {
        serde_json::from_str::<String>(trimmed)
            .unwrap_or_else(|_| trimmed.trim_matches('"').to_string())
    } else {
        trimmed.to_string()
    };
    usable_url(&unquoted)
}

fn usable_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == "false" {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeTransport;
    use serde_json::Value;

    fn gateway(fake: &FakeTransport) -> Gateway {
        Gateway::new(
            Arc::new(fake.clone()),
            GatewayOptions {
                base_url: "http://dam.local/".to_string(),
                user: "admin".to_string(),
            },
        )
    }

    fn key() -> Credential {
        Credential::new("secret").unwrap()
    }

    #[tokio::test]
    async fn call_signs_encoded_url() {
        let fake = FakeTransport::new();
        fake.reply("do_search", 200, "[]");

        let _: Option<Value> = gateway(&fake)
            .call(&key(), "do_search", &[("search", "red bike")])
            .await
            .unwrap();

        let qs = "user=admin&function=do_search&search=red%20bike";
        let expected = format!(
            "http://dam.local/api/?{qs}&sign={}",
            signature::signature("secret", qs)
        );
        assert_eq!(fake.requests(), vec![expected]);
    }

    #[tokio::test]
    async fn sentinel_bodies_are_absent() {
        let fake = FakeTransport::new();
        for body in ["", "  ", "false", "null"] {
            fake.reply("get_resource_data", 200, body);
        }
        let gw = gateway(&fake);
        for _ in 0..4 {
            let res: Option<Value> = gw
                .call(&key(), "get_resource_data", &[("resource", "1")])
                .await
                .unwrap();
            assert!(res.is_none());
        }
    }

    #[tokio::test]
    async fn error_status_carries_truncated_excerpt() {
        let fake = FakeTransport::new();
        fake.reply("do_search", 503, "x".repeat(2_000));

        let err = gateway(&fake)
            .call::<Value>(&key(), "do_search", &[])
            .await
            .unwrap_err();

        match err {
            ClientError::Upstream { status, excerpt, .. } => {
                assert_eq!(status, 503);
                assert_eq!(excerpt.len(), 500);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_decode_error() {
        let fake = FakeTransport::new();
        fake.reply("do_search", 200, r#"{"not":"a list"}"#);

        let err = gateway(&fake)
            .call::<Vec<Value>>(&key(), "do_search", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn network_failure_is_a_transport_error() {
        let fake = FakeTransport::new();
        fake.fail("do_search", "connection refused");

        let err = gateway(&fake)
            .call::<Value>(&key(), "do_search", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[tokio::test]
    async fn batch_with_no_ids_makes_no_request() {
        let fake = FakeTransport::new();
        let paths = gateway(&fake).batch_resource_paths(&key(), &[], "thm").await;
        assert!(paths.is_empty());
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn batch_signs_raw_brackets() {
        let fake = FakeTransport::new();
        fake.reply(FN_GET_RESOURCE_PATH, 200, r#"{"1":"u1","2":"u2"}"#);

        gateway(&fake).batch_resource_paths(&key(), &[1, 2], "thm").await;

        let qs = "user=admin&function=get_resource_path&ref=[1,2]&getfilepath=false&size=thm";
        let expected = format!(
            "http://dam.local/api/?{qs}&sign={}",
            signature::signature("secret", qs)
        );
        assert_eq!(fake.requests(), vec![expected]);
    }

    #[tokio::test]
    async fn batch_single_id_unquotes_bare_url() {
        let fake = FakeTransport::new();
        fake.reply(FN_GET_RESOURCE_PATH, 200, r#""http://x/y.jpg""#);

        let paths = gateway(&fake).batch_resource_paths(&key(), &[9], "thm").await;
        assert_eq!(paths, HashMap::from([(9, "http://x/y.jpg".to_string())]));
    }

    #[tokio::test]
    async fn batch_map_drops_false_entries() {
        let fake = FakeTransport::new();
        fake.reply(FN_GET_RESOURCE_PATH, 200, r#"{"1":"u1","2":"false"}"#);

        let paths = gateway(&fake).batch_resource_paths(&key(), &[1, 2], "thm").await;
        assert_eq!(paths, HashMap::from([(1, "u1".to_string())]));
    }

    #[tokio::test]
    async fn batch_failures_degrade_to_empty() {
        let fake = FakeTransport::new();
        fake.reply(FN_GET_RESOURCE_PATH, 500, "oops")
            .fail(FN_GET_RESOURCE_PATH, "timeout")
            .reply(FN_GET_RESOURCE_PATH, 200, "{broken")
            .reply(FN_GET_RESOURCE_PATH, 200, r#""http://x/only-one.jpg""#);
        let gw = gateway(&fake);

        for _ in 0..4 {
            assert!(gw.batch_resource_paths(&key(), &[1, 2], "thm").await.is_empty());
        }
    }

    #[tokio::test]
    async fn single_path_lookup_uses_encoded_form_and_omits_empty_size() {
        let fake = FakeTransport::new();
        fake.reply(FN_GET_RESOURCE_PATH, 200, r#""http:\/\/x\/full.png""#);

        let url = gateway(&fake).resource_path(&key(), 5, "").await.unwrap();

        assert_eq!(url.as_deref(), Some("http://x/full.png"));
        let sent = &fake.requests()[0];
        assert!(sent.contains("&ref=5&getfilepath=false&sign="));
        assert!(!sent.contains("size="));
    }

    #[tokio::test]
    async fn single_path_lookup_propagates_status_errors() {
        let fake = FakeTransport::new();
        fake.reply(FN_GET_RESOURCE_PATH, 401, "bad signature");

        let err = gateway(&fake).resource_path(&key(), 5, "").await.unwrap_err();
        assert!(matches!(err, ClientError::Upstream { status: 401, .. }));
    }

    #[test]
    fn sniff_classifies_shapes() {
        assert_eq!(PathLookup::sniff("false").unwrap(), PathLookup::Empty);
        assert_eq!(PathLookup::sniff(" \"\" ").unwrap(), PathLookup::Empty);
        assert_eq!(
            PathLookup::sniff("http://x/a.jpg").unwrap(),
            PathLookup::SingleUrl("http://x/a.jpg".to_string())
        );
        assert_eq!(
            PathLookup::sniff(r#"{"3":"u3","abc":"u","4":false,"5":""}"#).unwrap(),
            PathLookup::UrlMap(HashMap::from([(3, "u3".to_string())]))
        );
        assert!(PathLookup::sniff("{").is_err());
    }
}
