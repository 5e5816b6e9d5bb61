//! Request bodies and response decoding.
//!
//! Secret payloads and response envelopes are untyped JSON objects; the
//! server's shape is not fixed, so only "is a JSON object" is enforced.

use crate::error::{VaultError, VaultResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Secret data read from or written to the KV engine.
pub type SecretPayload = Map<String, Value>;

/// Parsed body of any Vault response.
pub type ResponseEnvelope = Map<String, Value>;

/// Result of deleting a secret.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Server answered 204 No Content
    Deleted,
    /// Server answered with a body instead
    Responded(ResponseEnvelope),
}

impl DeleteOutcome {
    /// Whether the server reported a plain deletion.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Body of `PUT /v1/sys/seal` and `PUT /v1/sys/unseal`.
///
/// `reset` travels as the string `"true"`/`"false"`, not a JSON boolean.
#[derive(Debug, Serialize)]
pub(crate) struct SealRequest<'a> {
    pub key: &'a str,
    pub reset: &'static str,
}

impl<'a> SealRequest<'a> {
    pub(crate) const fn new(key: &'a str, reset: bool) -> Self {
        Self {
            key,
            reset: if reset { "true" } else { "false" },
        }
    }
}

/// Body of `POST /v1/secret/data/{key}`.
#[derive(Debug, Serialize)]
pub(crate) struct WriteRequest<'a> {
    pub data: &'a SecretPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Vec<String>,
}

/// Decode a response body into a JSON object.
///
/// # Errors
///
/// Returns [`VaultError::Parse`] for malformed JSON, `null`, or any
/// non-object value.
pub fn decode_envelope(body: &[u8]) -> VaultResult<ResponseEnvelope> {
    Ok(serde_json::from_slice(body)?)
}

/// Extract the `errors` list from a failed response body.
///
/// # Errors
///
/// Returns [`VaultError::Parse`] if the body is not JSON or lacks `errors`.
pub fn parse_errors(body: &[u8]) -> VaultResult<Vec<String>> {
    let parsed: ErrorBody = serde_json::from_slice(body)?;
    Ok(parsed.errors)
}

/// Translate a failed response body into [`VaultError::Remote`].
///
/// Falls back to the decode error when the body carries no `errors` list.
#[must_use]
pub fn remote_error(body: &[u8]) -> VaultError {
    match parse_errors(body) {
        Ok(errors) => VaultError::remote(&errors),
        Err(e) => e,
    }
}

/// Read the seal state from a `sys/seal-status` envelope.
///
/// Only an explicit `"sealed": false` counts as unsealed; a missing or
/// non-boolean field is treated as sealed.
#[must_use]
pub fn sealed_flag(envelope: &ResponseEnvelope) -> bool {
    !matches!(envelope.get("sealed"), Some(Value::Bool(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_object() {
        let env = decode_envelope(br#"{"b": 1, "a": {"nested": [true]}}"#).unwrap();
        assert_eq!(env.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(env["a"], json!({"nested": [true]}));
    }

    #[test]
    fn test_decode_rejects_malformed_and_null() {
        assert!(matches!(decode_envelope(b"{not json"), Err(VaultError::Parse(_))));
        assert!(matches!(decode_envelope(b"null"), Err(VaultError::Parse(_))));
        assert!(matches!(decode_envelope(b""), Err(VaultError::Parse(_))));
        assert!(matches!(decode_envelope(b"[1, 2]"), Err(VaultError::Parse(_))));
    }

    #[test]
    fn test_remote_error_joins() {
        let err = remote_error(br#"{"errors": ["1 error occurred", "permission denied"]}"#);
        assert_eq!(err.to_string(), "Vault error: 1 error occurred, permission denied");
    }

    #[test]
    fn test_remote_error_without_errors_field() {
        let err = remote_error(br#"{"message": "nope"}"#);
        assert!(matches!(err, VaultError::Parse(_)));
        assert!(err.to_string().contains("errors"));
    }

    #[test]
    fn test_sealed_flag() {
        let env = |v: Value| v.as_object().cloned().unwrap();
        assert!(sealed_flag(&env(json!({"sealed": true}))));
        assert!(sealed_flag(&env(json!({}))));
        assert!(sealed_flag(&env(json!({"sealed": "false"}))));
        assert!(!sealed_flag(&env(json!({"sealed": false, "t": 3}))));
    }

    #[test]
    fn test_seal_request_uses_string_reset() {
        let body = serde_json::to_value(SealRequest::new("abcd", false)).unwrap();
        assert_eq!(body, json!({"key": "abcd", "reset": "false"}));

        let body = serde_json::to_value(SealRequest::new("abcd", true)).unwrap();
        assert_eq!(body["reset"], "true");
    }

    #[test]
    fn test_delete_outcome() {
        assert!(DeleteOutcome::Deleted.is_deleted());
        assert!(!DeleteOutcome::Responded(Map::new()).is_deleted());
    }
}
