//! reqwest-backed [`AuthApi`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use authflow_core::domain::Session;
use authflow_core::ports::{ApiError, AuthApi};
use authflow_shared::dto::{
    EmailLoginRequest, EmailRegisterRequest, GoogleLoginRequest, PasswordResetRequest,
    SetNewPasswordRequest,
};
use authflow_shared::{ErrorBody, MessageResponse, TokenResponse};

use crate::error::InfraError;

const REGISTER_PATH: &str = "/api/auth/email-register";
const LOGIN_PATH: &str = "/api/auth/email-login";
const RESEND_PATH: &str = "/api/auth/resend-verification";
const PASSWORD_RESET_PATH: &str = "/api/auth/password-reset";
const SET_NEW_PASSWORD_PATH: &str = "/api/auth/set-new-password";

/// Auth API client configuration.
#[derive(Debug, Clone)]
pub struct HttpAuthConfig {
    /// Backend origin (e.g., http://localhost:8000)
    pub base_url: String,
    /// Path of the Google token exchange; deployments use either
    /// `/api/auth/login-google` or `/api/auth/login/google`.
    pub google_login_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpAuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            google_login_path: "/api/auth/login-google".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Auth API over HTTP/JSON.
pub struct HttpAuthApi {
    client: Client,
    base_url: Url,
    google_login_path: String,
}

impl HttpAuthApi {
    pub fn new(config: HttpAuthConfig) -> Result<Self, InfraError> {
        let mut base_url =
            Url::parse(&config.base_url).map_err(|source| InfraError::InvalidUrl {
                url: config.base_url.clone(),
                source,
            })?;
        // Endpoints are appended to the base path, so it must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(config.timeout).build()?;

        tracing::debug!(base_url = %base_url, "Auth API client ready");

        Ok(Self {
            client,
            base_url,
            google_login_path: config.google_login_path,
        })
    }

    /// Resolve `path` under the base URL, keeping any prefix it carries.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::transport(format!("Invalid request URL {path}: {e}")))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.post(self.url(path)?))
    }

    /// Send the request; a non-2xx response becomes a classified [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Auth API request failed");
            ApiError::transport(e.to_string())
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn send_for_session(&self, request: RequestBuilder) -> Result<Session, ApiError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let body: TokenResponse = response.json().await.map_err(|e| {
            ApiError::from_response(status, None, format!("Unexpected response from server: {e}"))
        })?;

        Ok(Session::new(body.access_token, body.user))
    }

    /// Send a request whose success body is a plain acknowledgement.
    async fn send_for_ack(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = self.send(request).await?;
        let ack = response.json::<MessageResponse>().await.unwrap_or_default();
        if let Some(message) = ack.message {
            tracing::debug!(%message, "Auth API acknowledged request");
        }
        Ok(())
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_default();
    let detail = body.detail.unwrap_or_else(|| {
        format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    });

    tracing::debug!(status = status.as_u16(), code = ?body.code, "Auth API returned an error");
    ApiError::from_response(status.as_u16(), body.code.as_deref(), detail)
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        let body = EmailRegisterRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
            display_name: display_name.to_string(),
        };
        self.send_for_ack(self.post(REGISTER_PATH)?.json(&body)).await
    }

    async fn login(&self, email: &str, password: &SecretString) -> Result<Session, ApiError> {
        let body = EmailLoginRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };
        self.send_for_session(self.post(LOGIN_PATH)?.json(&body)).await
    }

    async fn login_with_id_token(&self, id_token: &SecretString) -> Result<Session, ApiError> {
        let body = GoogleLoginRequest {
            id_token: id_token.expose_secret().to_string(),
        };
        self.send_for_session(self.post(&self.google_login_path)?.json(&body)).await
    }

    async fn resend_verification(&self, email: &str) -> Result<(), ApiError> {
        let request = self.post(RESEND_PATH)?.query(&[("email", email)]);
        self.send_for_ack(request).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        self.send_for_ack(self.post(PASSWORD_RESET_PATH)?.json(&body)).await
    }

    async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &SecretString,
    ) -> Result<(), ApiError> {
        let body = SetNewPasswordRequest {
            oob_code: oob_code.to_string(),
            new_password: new_password.expose_secret().to_string(),
        };
        self.send_for_ack(self.post(SET_NEW_PASSWORD_PATH)?.json(&body)).await
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.send(self.client.get(self.url("/")?)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authflow_core::ports::ApiErrorKind;
    use mockito::Matcher;
    use serde_json::json;

    fn api_for(server: &mockito::ServerGuard) -> HttpAuthApi {
        HttpAuthApi::new(HttpAuthConfig {
            base_url: server.url(),
            timeout: Duration::from_secs(5),
            ..HttpAuthConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/email-login")
            .match_body(Matcher::Json(json!({
                "email": "ana@example.com",
                "password": "hunter22"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "tok-1",
                    "token_type": "bearer",
                    "user": {"email": "ana@example.com", "display_name": "Ana"}
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let session = api_for(&server)
            .login("ana@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();

        assert_eq!(session.access_token, "tok-1");
        assert_eq!(session.profile().unwrap().greeting_name(), "Ana");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_detail_is_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/email-register")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"Failed to register user: 400: Email already exists"}"#)
            .create_async()
            .await;

        let err = api_for(&server)
            .register("Ana", "ana@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::EmailExists);
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn test_error_code_wins_over_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/email-login")
            .with_status(403)
            .with_body(r#"{"detail":"Forbidden","code":"email_not_verified"}"#)
            .create_async()
            .await;

        let err = api_for(&server)
            .login("ana@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::EmailNotVerified);
        assert_eq!(err.detail, "Forbidden");
    }

    #[tokio::test]
    async fn test_missing_detail_falls_back_to_status_line() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/password-reset")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let err = api_for(&server)
            .request_password_reset("ana@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Other);
        assert_eq!(err.detail, "HTTP 502: Bad Gateway");
    }

    #[tokio::test]
    async fn test_resend_sends_email_as_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/resend-verification")
            .match_query(Matcher::UrlEncoded(
                "email".into(),
                "ana+1@example.com".into(),
            ))
            .with_status(200)
            .with_body(r#"{"message":"Verification email sent"}"#)
            .create_async()
            .await;

        api_for(&server)
            .resend_verification("ana+1@example.com")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_google_login_uses_configured_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login/google")
            .match_body(Matcher::Json(json!({"id_token": "google-id-token"})))
            .with_status(200)
            .with_body(r#"{"access_token":"tok-g","user":{"email":"g@example.com"}}"#)
            .create_async()
            .await;

        let api = HttpAuthApi::new(HttpAuthConfig {
            base_url: server.url(),
            google_login_path: "/api/auth/login/google".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let session = api
            .login_with_id_token(&SecretString::from("google-id-token"))
            .await
            .unwrap();
        assert_eq!(session.access_token, "tok-g");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_new_password_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/set-new-password")
            .match_body(Matcher::Json(json!({
                "oobCode": "oob-1",
                "new_password": "n3w-password"
            })))
            .with_status(200)
            .with_body(r#"{"message":"Password has been reset successfully"}"#)
            .create_async()
            .await;

        api_for(&server)
            .confirm_password_reset("oob-1", &SecretString::from("n3w-password"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let prefixed = server
            .mock("POST", "/backend/api/auth/password-reset")
            .with_status(200)
            .with_body(r#"{"message":"Password reset email sent"}"#)
            .expect(1)
            .create_async()
            .await;
        let bare = server
            .mock("POST", "/api/auth/password-reset")
            .expect(0)
            .create_async()
            .await;

        let api = HttpAuthApi::new(HttpAuthConfig {
            base_url: format!("{}/backend", server.url()),
            timeout: Duration::from_secs(5),
            ..HttpAuthConfig::default()
        })
        .unwrap();

        api.request_password_reset("ana@example.com").await.unwrap();
        prefixed.assert_async().await;
        bare.assert_async().await;
    }

    #[tokio::test]
    async fn test_acknowledgement_body_is_optional() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/email-register")
            .with_status(201)
            .create_async()
            .await;

        api_for(&server)
            .register("Ana", "ana@example.com", &SecretString::from("hunter22"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let api = HttpAuthApi::new(HttpAuthConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
            ..HttpAuthConfig::default()
        })
        .unwrap();

        let err = api.ping().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(err.status.is_none());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = HttpAuthApi::new(HttpAuthConfig {
            base_url: "not a url".to_string(),
            ..HttpAuthConfig::default()
        });
        assert!(matches!(result, Err(InfraError::InvalidUrl { .. })));
    }
}
