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

// Env values used in google services.
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

// OAuth2 token endpoint used when the credential file does not carry `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

pub const CLOUD_IDENTITY_ENDPOINT: &str = "https://cloudidentity.googleapis.com";

/// Scope for reading and writing Cloud Identity groups.
pub const CLOUD_IDENTITY_GROUPS_SCOPE: &str =
    "https://www.googleapis.com/auth/cloud-identity.groups";
/// Scope for reading and writing Admin SDK directory groups.
pub const ADMIN_DIRECTORY_GROUP_SCOPE: &str =
    "https://www.googleapis.com/auth/admin.directory.group";
/// Scope for reading and writing Admin SDK directory group memberships.
pub const ADMIN_DIRECTORY_GROUP_MEMBER_SCOPE: &str =
    "https://www.googleapis.com/auth/admin.directory.group.member";

/// Scopes requested for token verification and delegated access unless configured otherwise.
pub const REQUIRED_SCOPES: [&str; 3] = [
    CLOUD_IDENTITY_GROUPS_SCOPE,
    ADMIN_DIRECTORY_GROUP_SCOPE,
    ADMIN_DIRECTORY_GROUP_MEMBER_SCOPE,
];
