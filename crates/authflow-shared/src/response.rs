//! Response bodies returned by the auth API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn bearer() -> String {
    "bearer".to_string()
}

/// Issued on a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    /// The user record, passed through untouched.
    #[serde(default)]
    pub user: Value,
}

/// Plain acknowledgement, e.g. after registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body. `detail` is a human-readable string; `code` is an optional
/// machine-readable tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "detail_string")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Validation failures carry a list in `detail` instead of a string; keep the
/// first entry's `msg` so the user still sees something useful.
fn detail_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_defaults() {
        let body: TokenResponse = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(body.token_type, "bearer");
        assert!(body.user.is_null());
    }

    #[test]
    fn test_error_body_shapes() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"User not found","code":"user_not_found"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("User not found"));
        assert_eq!(body.code.as_deref(), Some("user_not_found"));

        let body: ErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"}]}"#,
        )
        .unwrap();
        assert_eq!(body.detail.as_deref(), Some("value is not a valid email address"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail.is_none());
    }
}
