// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Token verification, client builders and the group lister.
//!
//! Every function here reads the credential file on its own; nothing is
//! shared between the verification and the two client paths.

use std::io::Write;

use log::{debug, info};

use cloudgroups_core::utils::Redact;
use cloudgroups_core::{Context, Error, Result};

use crate::cloud_identity::{CloudIdentityClient, GroupView, ListGroupsRequest};
use crate::config::ServiceConfig;
use crate::constants::CLOUD_IDENTITY_GROUPS_SCOPE;
use crate::credential::{CredentialSummary, ServiceAccount};
use crate::provide_credential::ServiceAccountGrant;

async fn read_credential(ctx: &Context, config: &ServiceConfig) -> Result<Vec<u8>> {
    let path = config.credential_path().to_string_lossy();
    debug!("reading service account key from {path}");

    ctx.file_read(&path).await.map_err(|e| {
        Error::read_failed(format!("failed to read service account key {path}")).with_source(e)
    })
}

/// Check that the configured credential can mint an access token.
///
/// Progress is written to `out`, ending with the acquired token. With
/// `redact_token` only its first and last characters are shown.
pub async fn verify_token_access(
    ctx: &Context,
    config: &ServiceConfig,
    out: &mut dyn Write,
    redact_token: bool,
) -> Result<()> {
    let content = read_credential(ctx, config).await?;
    let summary = CredentialSummary::from_slice(&content)?;
    let delegated_user = config.delegated_user().unwrap_or_default();

    writeln!(out, "Attempting authentication with:")?;
    writeln!(out, "- Service Account: {}", summary.client_email)?;
    writeln!(out, "- Project ID: {}", summary.project_id)?;
    writeln!(out, "- Delegated User: {delegated_user}")?;
    writeln!(out, "- Requested Scopes: [{}]", config.scopes().join(" "))?;

    let mut grant = ServiceAccountGrant::from_slice(&content, config.scopes())?;
    if let Some(user) = config.delegated_user() {
        grant = grant.with_subject(user);
        writeln!(out, "Using delegation with subject: {user}")?;
    }

    let token = grant.token(ctx).await?;
    writeln!(out, "Token acquired successfully")?;
    if redact_token {
        writeln!(out, "Token: {}", Redact::from(&token.access_token))?;
    } else {
        writeln!(out, "Token: {}", token.access_token)?;
    }

    Ok(())
}

/// Build a client that acts as the service account itself.
///
/// The grant is restricted to the Cloud Identity groups scope.
pub async fn new_service_without_delegation(
    ctx: &Context,
    config: &ServiceConfig,
) -> Result<CloudIdentityClient> {
    let content = read_credential(ctx, config).await?;
    let sa = ServiceAccount::from_slice(&content).map_err(|e| {
        Error::client_construction("failed to create service without delegation").with_source(e)
    })?;

    let grant = ServiceAccountGrant::new(sa, [CLOUD_IDENTITY_GROUPS_SCOPE]);
    CloudIdentityClient::new(ctx.clone(), grant, config.endpoint())
}

/// Build a client that impersonates the configured delegated user.
pub async fn new_service_with_delegation(
    ctx: &Context,
    config: &ServiceConfig,
) -> Result<CloudIdentityClient> {
    let user = config
        .delegated_user()
        .ok_or_else(|| Error::missing_delegation_target("delegated user is required for delegation"))?;

    let content = read_credential(ctx, config).await?;
    let grant = ServiceAccountGrant::from_slice(&content, config.scopes())?.with_subject(user);
    CloudIdentityClient::new(ctx.clone(), grant, config.endpoint())
}

/// List one page of a customer's groups, writing `Group: <name>` per group.
pub async fn list_groups(
    client: &CloudIdentityClient,
    customer_id: &str,
    page_size: u32,
    out: &mut dyn Write,
) -> Result<()> {
    let req = ListGroupsRequest::for_customer(customer_id)
        .with_view(GroupView::Basic)
        .with_page_size(page_size);
    let resp = client.list_groups(&req).await?;

    for group in &resp.groups {
        writeln!(out, "Group: {}", group.display_name)?;
    }

    if let Some(token) = resp.next_page_token.as_deref().filter(|v| !v.is_empty()) {
        info!(
            "more groups are available for customer {customer_id}, next page token: {token}"
        );
    }

    Ok(())
}
