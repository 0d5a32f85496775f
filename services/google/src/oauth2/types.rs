//! OAuth2 type definitions for Google services

use serde::Deserialize;

/// OAuth2 token response returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token issued by the authorization server.
    pub access_token: String,

    /// The lifetime in seconds of the access token.
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// The type of token issued (typically "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
}

/// OAuth2 error response, e.g. `{"error": "unauthorized_client", "error_description": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
