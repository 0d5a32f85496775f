//! Google service account authentication and Cloud Identity groups listing.
//!
//! ```no_run
//! use cloudgroups_core::Context;
//! use cloudgroups_google::{
//!     list_groups, new_service_with_delegation, verify_token_access, ServiceConfig,
//! };
//!
//! # async fn run(ctx: Context) -> cloudgroups_core::Result<()> {
//! let config = ServiceConfig::new("/etc/keys/sa.json", "admin@example.com", "C03ygpcl8")?;
//! let mut out = std::io::stdout();
//!
//! verify_token_access(&ctx, &config, &mut out, false).await?;
//! let client = new_service_with_delegation(&ctx, &config).await?;
//! list_groups(&client, config.customer_id(), 10, &mut out).await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{
    ADMIN_DIRECTORY_GROUP_MEMBER_SCOPE, ADMIN_DIRECTORY_GROUP_SCOPE, CLOUD_IDENTITY_ENDPOINT,
    CLOUD_IDENTITY_GROUPS_SCOPE, GOOGLE_APPLICATION_CREDENTIALS, REQUIRED_SCOPES,
};

mod config;
pub use config::ServiceConfig;

mod credential;
pub use credential::{CredentialSummary, ServiceAccount, Token};

mod oauth2;

mod provide_credential;
pub use provide_credential::ServiceAccountGrant;

mod sign_request;
pub use sign_request::RequestSigner;

mod cloud_identity;
pub use cloud_identity::{
    CloudIdentityClient, EntityKey, Group, GroupView, ListGroupsRequest, ListGroupsResponse,
};

mod service;
pub use service::{
    list_groups, new_service_with_delegation, new_service_without_delegation,
    verify_token_access,
};
