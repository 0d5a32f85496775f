use std::path::{Path, PathBuf};

use log::debug;

use cloudgroups_core::{Error, Result};

use crate::constants::{CLOUD_IDENTITY_ENDPOINT, REQUIRED_SCOPES};

/// ServiceConfig carries everything needed to reach a customer's groups.
///
/// The credential path is validated and canonicalized at construction; the
/// value is not changed afterwards.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    credential_path: PathBuf,
    delegated_user: Option<String>,
    customer_id: String,
    scopes: Vec<String>,
    endpoint: String,
}

impl ServiceConfig {
    /// Create a new config.
    ///
    /// `key_path` is resolved against the current directory. An empty
    /// `delegated_user` disables delegation.
    pub fn new(
        key_path: &str,
        delegated_user: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Result<Self> {
        let credential_path = resolve_key_path(Path::new(key_path))?;
        debug!("resolved credential path: {}", credential_path.display());

        let delegated_user = Some(delegated_user.into()).filter(|v| !v.is_empty());

        Ok(Self {
            credential_path,
            delegated_user,
            customer_id: customer_id.into(),
            scopes: REQUIRED_SCOPES.iter().map(|v| v.to_string()).collect(),
            endpoint: CLOUD_IDENTITY_ENDPOINT.to_string(),
        })
    }

    /// Replace the scopes requested for verification and delegated access.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the Cloud Identity API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Absolute, canonical path of the service account key file.
    pub fn credential_path(&self) -> &Path {
        &self.credential_path
    }

    /// The user to impersonate, if delegation is configured.
    pub fn delegated_user(&self) -> Option<&str> {
        self.delegated_user.as_deref()
    }

    /// The customer whose groups are listed.
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Scopes requested for verification and delegated access.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// The Cloud Identity API endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn resolve_key_path(path: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(path)
        .map_err(|e| Error::path_resolution("failed to resolve key path").with_source(e))?;

    match abs.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(Error::missing_file(format!(
                "service account key file does not exist: {}",
                abs.display()
            )))
        }
        Err(e) => {
            return Err(Error::path_resolution(format!(
                "failed to check key path: {}",
                abs.display()
            ))
            .with_source(e))
        }
    }

    abs.canonicalize()
        .map_err(|e| Error::path_resolution("failed to resolve key path").with_source(e))
}
