//! [`IdentityProvider`] backed by the Identity Toolkit REST API.
//!
//! Errors are reported with the same `auth/...` codes the browser SDK uses so
//! the controller can map them without knowing which client produced them.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::form_urlencoded;

use authflow_core::ports::{IdentityError, IdentityProvider, IdentityUser};

use super::PopupHandler;
use crate::error::InfraError;

const INVALID_API_KEY: &str = "auth/invalid-api-key";
const INVALID_USER_TOKEN: &str = "auth/invalid-user-token";

/// Identity Toolkit configuration.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Web API key of the project
    pub api_key: String,
    /// API host; point at the auth emulator for local runs
    pub auth_host: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            auth_host: "https://identitytoolkit.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct FirebaseIdentity {
    client: Client,
    config: FirebaseConfig,
    popup: Option<Arc<dyn PopupHandler>>,
    /// uid of the signed-in user; REST sign-in has no server-side session
    current_uid: Mutex<Option<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordSignIn<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    #[serde(default)]
    email_verified: bool,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: String,
}

impl FirebaseIdentity {
    pub fn new(config: FirebaseConfig) -> Result<Self, InfraError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            popup: None,
            current_uid: Mutex::new(None),
        })
    }

    /// Attach the handler that runs the interactive part of popup sign-in.
    pub fn with_popup(mut self, popup: Arc<dyn PopupHandler>) -> Self {
        self.popup = Some(popup);
        self
    }

    /// uid of the user signed in through this client, if any.
    pub fn current_uid(&self) -> Option<String> {
        self.current_uid
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current(&self, uid: Option<String>) {
        *self.current_uid.lock().unwrap_or_else(PoisonError::into_inner) = uid;
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, IdentityError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if self.config.api_key.trim().is_empty() {
            return Err(IdentityError::new(
                INVALID_API_KEY,
                "Identity provider API key is not configured",
            ));
        }

        let url = format!(
            "{}/v1/accounts:{method}",
            self.config.auth_host.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(method, error = %e, "Identity provider request failed");
                IdentityError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            tracing::debug!(
                method,
                status = status.as_u16(),
                %message,
                "Identity provider rejected request"
            );
            return Err(error_from_message(&message));
        }

        response.json::<T>().await.map_err(|e| {
            IdentityError::new(
                IdentityError::INTERNAL,
                format!("Unexpected identity provider response: {e}"),
            )
        })
    }

    async fn email_verified(&self, id_token: &str) -> Result<bool, IdentityError> {
        let lookup: LookupResponse = self.call("lookup", &json!({ "idToken": id_token })).await?;
        let user = lookup.users.into_iter().next().ok_or_else(|| {
            IdentityError::new(IdentityError::USER_NOT_FOUND, "No user for this token")
        })?;
        Ok(user.email_verified)
    }
}

/// Translate an Identity Toolkit error message (`CODE` or `CODE : detail`)
/// into the SDK's `auth/...` code.
fn error_from_message(message: &str) -> IdentityError {
    let (tag, detail) = match message.split_once(" : ") {
        Some((tag, detail)) => (tag.trim(), detail.trim()),
        None => (message.trim(), message.trim()),
    };

    let code = match tag {
        "EMAIL_NOT_FOUND" => IdentityError::USER_NOT_FOUND,
        "INVALID_PASSWORD" => IdentityError::WRONG_PASSWORD,
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => IdentityError::INVALID_CREDENTIAL,
        "USER_DISABLED" => IdentityError::USER_DISABLED,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => IdentityError::TOO_MANY_REQUESTS,
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => INVALID_USER_TOKEN,
        t if t.starts_with("API key not valid") || t == "INVALID_API_KEY" => INVALID_API_KEY,
        _ => IdentityError::INTERNAL,
    };
    IdentityError::new(code, detail)
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in_with_popup(&self) -> Result<IdentityUser, IdentityError> {
        let Some(popup) = &self.popup else {
            return Err(IdentityError::popup_blocked());
        };
        let Some(credential) = popup.google_credential().await? else {
            return Err(IdentityError::popup_closed());
        };

        let post_body = form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", credential.expose_secret())
            .append_pair("providerId", "google.com")
            .finish();
        let response: SignInResponse = self
            .call(
                "signInWithIdp",
                &json!({
                    "postBody": post_body,
                    "requestUri": "http://localhost",
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;

        self.set_current(Some(response.local_id.clone()));
        tracing::info!(uid = %response.local_id, "Signed in with Google");

        Ok(IdentityUser::new(
            response.local_id,
            response.email,
            response.email_verified.unwrap_or(false),
            SecretString::from(response.id_token),
        ))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentityUser, IdentityError> {
        let response: SignInResponse = self
            .call(
                "signInWithPassword",
                &PasswordSignIn {
                    email,
                    password: password.expose_secret(),
                    return_secure_token: true,
                },
            )
            .await?;

        // signInWithPassword does not report verification; ask for it.
        let email_verified = match response.email_verified {
            Some(verified) => verified,
            None => self.email_verified(&response.id_token).await?,
        };

        self.set_current(Some(response.local_id.clone()));
        tracing::debug!(uid = %response.local_id, email_verified, "Signed in with password");

        Ok(IdentityUser::new(
            response.local_id,
            response.email.or_else(|| Some(email.to_string())),
            email_verified,
            SecretString::from(response.id_token),
        ))
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.set_current(None);
        Ok(())
    }
}
