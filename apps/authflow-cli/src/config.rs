//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use authflow_core::{ControllerConfig, VerificationMode};
use authflow_infra::{FirebaseConfig, HttpAuthConfig};

/// Where the session is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    File,
    Memory,
    Redis,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "memory" => Ok(StorageKind::Memory),
            "redis" => Ok(StorageKind::Redis),
            other => Err(format!("unknown storage kind: {other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: HttpAuthConfig,
    pub firebase: FirebaseConfig,
    pub controller: ControllerConfig,
    pub storage: StorageKind,
    pub storage_path: PathBuf,
    pub redis_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(key) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError {
                    var: key,
                    reason: format!("'{value}' is not a number"),
                }),
                None => Ok(default),
            }
        };

        let timeout = Duration::from_secs(number("AUTHFLOW_HTTP_TIMEOUT_SECS", 30)?);

        let verification_mode = match lookup("AUTHFLOW_VERIFICATION_MODE") {
            Some(value) => value.parse::<VerificationMode>().map_err(|reason| ConfigError {
                var: "AUTHFLOW_VERIFICATION_MODE",
                reason,
            })?,
            None => VerificationMode::default(),
        };

        let storage = match lookup("AUTHFLOW_STORAGE") {
            Some(value) => value.parse::<StorageKind>().map_err(|reason| ConfigError {
                var: "AUTHFLOW_STORAGE",
                reason,
            })?,
            None => StorageKind::default(),
        };

        Ok(Self {
            api: HttpAuthConfig {
                base_url: var("AUTHFLOW_API_BASE_URL", "http://localhost:8000"),
                google_login_path: var("AUTHFLOW_GOOGLE_LOGIN_PATH", "/api/auth/login-google"),
                timeout,
            },
            firebase: FirebaseConfig {
                api_key: var("FIREBASE_API_KEY", ""),
                auth_host: var("FIREBASE_AUTH_HOST", "https://identitytoolkit.googleapis.com"),
                timeout,
            },
            controller: ControllerConfig {
                verification_mode,
                redirect_target: var("AUTHFLOW_REDIRECT_URL", "/dashboard"),
                redirect_delay: Duration::from_millis(number("AUTHFLOW_REDIRECT_DELAY_MS", 2000)?),
            },
            storage,
            storage_path: PathBuf::from(var("AUTHFLOW_STORAGE_PATH", ".authflow/storage.json")),
            redis_url: var("REDIS_URL", "redis://localhost:6379"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.google_login_path, "/api/auth/login-google");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.controller.verification_mode, VerificationMode::SdkAssisted);
        assert_eq!(config.controller.redirect_target, "/dashboard");
        assert_eq!(config.controller.redirect_delay, Duration::from_millis(2000));
        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.storage_path, PathBuf::from(".authflow/storage.json"));
        assert!(config.firebase.api_key.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("AUTHFLOW_API_BASE_URL", "https://auth.example.com"),
            ("AUTHFLOW_GOOGLE_LOGIN_PATH", "/api/auth/login/google"),
            ("AUTHFLOW_VERIFICATION_MODE", "backend"),
            ("AUTHFLOW_STORAGE", "memory"),
            ("AUTHFLOW_HTTP_TIMEOUT_SECS", "5"),
            ("AUTHFLOW_REDIRECT_DELAY_MS", "0"),
        ])
        .unwrap();

        assert_eq!(config.api.base_url, "https://auth.example.com");
        assert_eq!(config.api.google_login_path, "/api/auth/login/google");
        assert_eq!(config.controller.verification_mode, VerificationMode::BackendOnly);
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.firebase.timeout, Duration::from_secs(5));
        assert_eq!(config.controller.redirect_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config_from(&[("AUTHFLOW_VERIFICATION_MODE", "maybe")]).unwrap_err();
        assert_eq!(err.var, "AUTHFLOW_VERIFICATION_MODE");

        let err = config_from(&[("AUTHFLOW_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err.var, "AUTHFLOW_HTTP_TIMEOUT_SECS");
    }
}
