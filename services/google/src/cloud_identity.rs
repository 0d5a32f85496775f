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

//! Client for the Cloud Identity v1 groups API.

use std::collections::HashMap;

use bytes::Bytes;
use http::{header::ACCEPT, Method, StatusCode, Uri};
use log::{debug, error};
use serde::Deserialize;

use cloudgroups_core::{Context, Error, Result, Signer};

use crate::credential::Token;
use crate::provide_credential::ServiceAccountGrant;
use crate::sign_request::RequestSigner;

/// How much of each group the API returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupView {
    /// Reduced field set.
    #[default]
    Basic,
    /// All fields.
    Full,
}

impl GroupView {
    fn as_str(&self) -> &'static str {
        match self {
            GroupView::Basic => "BASIC",
            GroupView::Full => "FULL",
        }
    }
}

/// Parameters of a `groups.list` call.
#[derive(Debug, Clone)]
pub struct ListGroupsRequest {
    /// Resource the groups belong to, e.g. `customers/C03ygpcl8`.
    pub parent: String,
    /// Response view.
    pub view: GroupView,
    /// Maximum number of groups in the page.
    pub page_size: Option<u32>,
    /// Token of the page to fetch.
    pub page_token: Option<String>,
}

impl ListGroupsRequest {
    /// List the groups of a customer.
    pub fn for_customer(customer_id: &str) -> Self {
        Self {
            parent: format!("customers/{customer_id}"),
            view: GroupView::Basic,
            page_size: None,
            page_token: None,
        }
    }

    /// Set the response view.
    pub fn with_view(mut self, view: GroupView) -> Self {
        self.view = view;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Continue from a previous page.
    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    fn query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("parent", &self.parent);
        query.append_pair("view", self.view.as_str());
        if let Some(page_size) = self.page_size {
            query.append_pair("pageSize", &page_size.to_string());
        }
        if let Some(page_token) = &self.page_token {
            query.append_pair("pageToken", page_token);
        }
        query.finish()
    }
}

/// A page of groups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsResponse {
    /// Groups in server order.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Token of the next page, absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A Cloud Identity group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Resource name, e.g. `groups/01abc`.
    #[serde(default)]
    pub name: String,
    /// The unique key of the group.
    #[serde(default)]
    pub group_key: Option<EntityKey>,
    /// Parent resource, e.g. `customers/C03ygpcl8`.
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// The key of a group, typically its email address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntityKey {
    pub id: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// CloudIdentityClient calls the Cloud Identity API with tokens minted from a grant.
///
/// Tokens are fetched on first use and cached for the life of the client.
#[derive(Debug, Clone)]
pub struct CloudIdentityClient {
    signer: Signer<Token>,
    endpoint: String,
    subject: Option<String>,
}

impl CloudIdentityClient {
    /// Build a client for `endpoint` authorized by `grant`.
    pub fn new(ctx: Context, grant: ServiceAccountGrant, endpoint: &str) -> Result<Self> {
        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::client_construction(format!("invalid endpoint {endpoint}")).with_source(e)
        })?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::client_construction(format!(
                "invalid endpoint {endpoint}: scheme and host are required"
            )));
        }

        let subject = grant.subject().map(str::to_string);
        Ok(Self {
            signer: Signer::new(ctx, grant, RequestSigner),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subject,
        })
    }

    /// The user requests are made as, `None` when acting as the service account.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Fetch one page of groups.
    pub async fn list_groups(&self, req: &ListGroupsRequest) -> Result<ListGroupsResponse> {
        let url = format!("{}/v1/groups?{}", self.endpoint, req.query());
        debug!("listing groups: {url}");

        let (mut parts, _) = http::Request::builder()
            .method(Method::GET)
            .uri(&url)
            .header(ACCEPT, "application/json")
            .body(())
            .map_err(|e| Error::list_failed("failed to build list request").with_source(e))?
            .into_parts();

        self.signer.sign(&mut parts).await.map_err(|e| {
            Error::list_failed(format!("failed to list groups: {e}")).with_source(e)
        })?;

        let resp = self
            .signer
            .context()
            .http_send(http::Request::from_parts(parts, Bytes::new()))
            .await
            .map_err(|e| Error::list_failed(format!("failed to list groups: {e}")).with_source(e))?;

        if resp.status() != StatusCode::OK {
            error!("list groups request to {} failed: {:?}", url, resp.status());
            return Err(Error::list_failed(format!(
                "failed to list groups ({}): {}",
                resp.status(),
                describe_api_error(resp.body())
            )));
        }

        serde_json::from_slice(resp.body())
            .map_err(|e| Error::list_failed("failed to parse list groups response").with_source(e))
    }
}

fn describe_api_error(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse { error }) => {
            format!("{} {}: {}", error.code, error.status, error.message)
        }
        Err(_) => String::from_utf8_lossy(body).to_string(),
    }
}
