//! Request signing for the upstream function API.
//!
//! The upstream authenticates a call by recomputing
//! `sha256(private_key + query_string)` over the query string exactly as it
//! arrives, so the string that is signed must be byte-identical to the string
//! that is sent. Two builders exist for that reason: the percent-encoded form
//! used by ordinary calls and the raw form used when a value carries literal
//! `[..]` array syntax.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex signature for `query_string`.
///
/// The key is prepended with no separator.
pub fn signature(secret_key: &str, query_string: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret_key.as_bytes());
    hasher.update(query_string.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build `user=..&function=..&k=v..` with every key and value percent-encoded.
///
/// Parameters with an empty value are left out entirely.
pub fn encoded_query_string(user: &str, function: &str, params: &[(&str, &str)]) -> String {
    join_query(user, function, params, |s| urlencoding::encode(s).into_owned())
}

/// Same layout as [`encoded_query_string`] but with keys and values verbatim.
pub fn raw_query_string(user: &str, function: &str, params: &[(&str, &str)]) -> String {
    join_query(user, function, params, str::to_owned)
}

/// Signed URL over the percent-encoded query string.
pub fn signed_url(
    base: &str,
    user: &str,
    secret_key: &str,
    function: &str,
    params: &[(&str, &str)],
) -> String {
    finish_url(base, secret_key, encoded_query_string(user, function, params))
}

/// Signed URL over the raw query string. Used for array-valued parameters.
pub fn signed_url_raw(
    base: &str,
    user: &str,
    secret_key: &str,
    function: &str,
    params: &[(&str, &str)],
) -> String {
    finish_url(base, secret_key, raw_query_string(user, function, params))
}

/// Render ids as a compact JSON array, e.g. `[1,2,3]`.
pub fn ids_as_json_array(ids: &[i64]) -> String {
    let body: Vec<String> = ids.iter().map(i64::to_string).collect();
    format!("[{}]", body.join(","))
}

fn join_query<F>(user: &str, function: &str, params: &[(&str, &str)], enc: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut parts = Vec::with_capacity(params.len() + 2);
    parts.push(format!("user={}", enc(user)));
    parts.push(format!("function={}", enc(function)));
    for (key, value) in params {
        if value.is_empty() {
            continue;
        }
        parts.push(format!("{}={}", enc(key), enc(value)));
    }
    parts.join("&")
}

fn finish_url(base: &str, secret_key: &str, query: String) -> String {
    let sign = signature(secret_key, &query);
    format!("{}/api/?{}&sign={}", base.trim_end_matches('/'), query, sign)
}
