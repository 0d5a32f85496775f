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

use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header as JwtHeader};
use log::debug;
use serde::Serialize;

use cloudgroups_core::time::{format_rfc3339, now};
use cloudgroups_core::{Context, Error, ProvideCredential, Result};

use crate::constants::JWT_BEARER_GRANT_TYPE;
use crate::credential::{ServiceAccount, Token};
use crate::oauth2::{helpers, types::TokenResponse};

/// Assertions are issued slightly in the past so receivers with a skewed clock
/// don't see `iat` in the future.
const CLOCK_SKEW_FUDGE: Duration = Duration::from_secs(10);
const ASSERTION_LIFETIME: Duration = Duration::from_secs(3600);

/// Claims of the JWT bearer assertion.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: i64,
    iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
}

/// ServiceAccountGrant is an authorization grant built from a service account key.
///
/// It signs a JWT assertion over the requested scopes and exchanges it at the
/// credential's token endpoint. With a subject set, the token acts as that user
/// through domain-wide delegation.
#[derive(Debug, Clone)]
pub struct ServiceAccountGrant {
    service_account: ServiceAccount,
    scopes: Vec<String>,
    subject: Option<String>,
}

impl ServiceAccountGrant {
    /// Create a grant over the given scopes.
    pub fn new<I, S>(service_account: ServiceAccount, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service_account,
            scopes: scopes.into_iter().map(Into::into).collect(),
            subject: None,
        }
    }

    /// Parse a service account credential file and create a grant over the given scopes.
    pub fn from_slice<I, S>(content: &[u8], scopes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sa = ServiceAccount::from_slice(content)?;
        Ok(Self::new(sa, scopes))
    }

    /// Set the user to impersonate.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// The scopes requested by this grant.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// The impersonated user, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Build the signed JWT assertion.
    fn assertion(&self) -> Result<String> {
        let iat = now().timestamp() - CLOCK_SKEW_FUDGE.as_secs() as i64;
        let claims = Claims {
            iss: self.service_account.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.service_account.token_uri().to_string(),
            exp: iat + ASSERTION_LIFETIME.as_secs() as i64,
            iat,
            sub: self.subject.clone(),
        };

        let mut header = JwtHeader::new(Algorithm::RS256);
        header.kid = self.service_account.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.service_account.private_key.as_bytes())
            .map_err(|e| Error::token_acquisition("failed to parse RSA private key").with_source(e))?;

        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| Error::token_acquisition("failed to encode JWT").with_source(e))
    }

    /// Exchange the grant for an access token.
    pub async fn token(&self, ctx: &Context) -> Result<Token> {
        debug!(
            "exchanging service account {} for token with scope: {:?}, subject: {:?}",
            self.service_account.client_email, self.scopes, self.subject
        );

        let assertion = self.assertion()?;
        let resp: TokenResponse = helpers::oauth2_form_post(
            ctx,
            self.service_account.token_uri(),
            &[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion.as_str())],
        )
        .await?;

        let token = helpers::token_from_response(resp)?;
        if let Some(expires_at) = token.expires_at {
            debug!(
                "token for {} expires at {}",
                self.service_account.client_email,
                format_rfc3339(expires_at)
            );
        }
        Ok(token)
    }
}

#[async_trait::async_trait]
impl ProvideCredential for ServiceAccountGrant {
    type Credential = Token;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.token(ctx).await.map(Some)
    }
}
