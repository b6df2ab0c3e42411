//! Per-request upstream credential.

use std::fmt;

use crate::error::ClientError;

/// The caller's upstream private key. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap `key`, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Parse an `Authorization` header value of the form `Bearer <key>`.
    ///
    /// The scheme is matched case-insensitively.
    pub fn from_bearer(header: &str) -> Option<Self> {
        let (scheme, rest) = header.trim_start().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Self::new(rest)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Immutable state for one inbound request, passed explicitly into every
/// picker operation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    credential: Option<Credential>,
    correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new(credential: Option<Credential>) -> Self {
        Self {
            credential,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// The credential, or [`ClientError::Unauthenticated`] when none was sent.
    pub fn credential(&self) -> Result<&Credential, ClientError> {
        self.credential.as_ref().ok_or(ClientError::Unauthenticated)
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn bearer_header_is_parsed() {
        let cred = Credential::from_bearer("Bearer abc123").unwrap();
        assert_eq!(cred.expose(), "abc123");
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(Credential::from_bearer("bearer  k ").unwrap().expose(), "k");
        assert_eq!(Credential::from_bearer("BEARER k").unwrap().expose(), "k");
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        assert!(Credential::from_bearer("Basic dXNlcjpwYXNz").is_none());
        assert!(Credential::from_bearer("Bearer ").is_none());
        assert!(Credential::from_bearer("Bearer").is_none());
        assert!(Credential::from_bearer("").is_none());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let cred = Credential::new("super-secret").unwrap();
        assert!(!format!("{cred:?}").contains("super-secret"));
    }

    #[test]
    fn missing_credential_is_an_auth_error() {
        let ctx = RequestContext::default();
        assert!(matches!(ctx.credential(), Err(ClientError::Unauthenticated)));
    }
}
