use cloudgroups_core::time::{now, DateTime};
use cloudgroups_core::utils::Redact;
use cloudgroups_core::{Error, Result, SigningCredential};
use std::fmt::{self, Debug};

use crate::constants::DEFAULT_TOKEN_URI;

/// CredentialSummary carries the identity fields of a credential document.
///
/// It is parsed leniently: missing fields become empty strings, only malformed
/// JSON is an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CredentialSummary {
    /// The client email of the service account.
    #[serde(default)]
    pub client_email: String,
    /// The project owning the service account.
    #[serde(default)]
    pub project_id: String,
}

impl CredentialSummary {
    /// Parse the summary from credential file bytes.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        serde_json::from_slice(v).map_err(|e| {
            Error::parse_failed("failed to parse service account JSON").with_source(e)
        })
    }
}

/// ServiceAccount holds the key material needed to mint a JWT grant.
#[derive(Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceAccount {
    /// Private key of credential
    pub private_key: String,
    /// The client email of credential
    pub client_email: String,
    /// Identifier of the private key, sent as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// The project owning the service account.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Token endpoint of the credential.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccount {
    /// Parse a `service_account` credential file.
    ///
    /// Other credential types are rejected.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        let file: CredentialFile = serde_json::from_slice(v).map_err(|e| {
            Error::parse_failed("failed to parse service account key").with_source(e)
        })?;

        match file {
            CredentialFile::ServiceAccount(sa) => Ok(sa),
            CredentialFile::Unsupported => Err(Error::parse_failed(
                "failed to parse service account key: 'type' field is not \"service_account\"",
            )),
        }
    }

    /// The token endpoint to exchange grants at.
    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }
}

/// CredentialFile represents the credential documents we understand.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CredentialFile {
    ServiceAccount(ServiceAccount),
    #[serde(other)]
    Unsupported,
}

/// Token represents an OAuth2 access token with expiration.
#[derive(Clone, Default)]
pub struct Token {
    /// The access token.
    pub access_token: String,
    /// The expiration time of the token.
    pub expires_at: Option<DateTime>,
}

impl Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SigningCredential for Token {
    fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }

        match self.expires_at {
            Some(expires_at) => {
                // Consider token invalid if it expires within 2 minutes
                let buffer = chrono::TimeDelta::try_seconds(2 * 60).expect("in bounds");
                now() < expires_at - buffer
            }
            None => true,
        }
    }
}
