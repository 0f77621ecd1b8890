//! Errors raised while building adapters. Runtime failures go through the
//! port error types instead.

#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
