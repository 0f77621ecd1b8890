//! Data Transfer Objects - request bodies for the auth API.

use serde::{Deserialize, Serialize};

/// Request to register with email and password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Request to login with email and password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to exchange a Google ID token for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub id_token: String,
}

/// Request a password reset email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Set a new password with the code from the reset email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetNewPasswordRequest {
    #[serde(rename = "oobCode")]
    pub oob_code: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_new_password_uses_camel_case_code() {
        let body = serde_json::to_value(SetNewPasswordRequest {
            oob_code: "abc".into(),
            new_password: "n3w-password".into(),
        })
        .unwrap();

        assert_eq!(body, json!({"oobCode": "abc", "new_password": "n3w-password"}));
    }
}
