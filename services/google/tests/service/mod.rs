mod builders;
mod list_groups;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;
use cloudgroups_core::{Context, HttpSend, Result, StaticEnv};
use cloudgroups_file_read_tokio::TokioFileRead;
use cloudgroups_google::ServiceConfig;
use tempfile::TempDir;

pub const TEST_CREDENTIAL: &str = include_str!("../../testdata/test_credential.json");
pub const CUSTOMER_ID: &str = "C03ygpcl8";
pub const ADMIN_USER: &str = "admin@example.com";
pub const ACCESS_TOKEN: &str = "ya29.mock-access-token";

/// A recorded request, kept as owned parts so tests can inspect it after the call.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: http::Method,
    pub uri: http::Uri,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    /// Parse the form body of a token request.
    pub fn form(&self) -> HashMap<String, String> {
        form_urlencoded::parse(&self.body).into_owned().collect()
    }

    /// Decode the claims of the JWT assertion carried by a token request.
    pub fn assertion_claims(&self) -> serde_json::Value {
        let form = self.form();
        let assertion = form.get("assertion").expect("assertion must be sent");
        let payload = assertion.split('.').nth(1).expect("jwt must have a payload");
        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .expect("payload must be base64url");
        serde_json::from_slice(&decoded).expect("payload must be json")
    }

    /// Decode the header of the JWT assertion carried by a token request.
    pub fn assertion_header(&self) -> serde_json::Value {
        let form = self.form();
        let assertion = form.get("assertion").expect("assertion must be sent");
        let header = assertion.split('.').next().expect("jwt must have a header");
        let decoded = URL_SAFE_NO_PAD
            .decode(header)
            .expect("header must be base64url");
        serde_json::from_slice(&decoded).expect("header must be json")
    }
}

/// In-memory `HttpSend` answering by request path.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    responses: Arc<Mutex<HashMap<String, (http::StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests to `path` with `status` and `body`.
    pub fn respond(self, path: &str, status: http::StatusCode, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.into()));
        self
    }

    /// Answer token requests with a valid token.
    pub fn with_token(self) -> Self {
        self.respond(
            "/token",
            http::StatusCode::OK,
            serde_json::json!({
                "access_token": ACCESS_TOKEN,
                "expires_in": 3599,
                "token_type": "Bearer",
            })
            .to_string(),
        )
    }

    /// Answer list requests with the given display names.
    pub fn with_groups(self, names: &[&str]) -> Self {
        let groups: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::json!({
                    "name": format!("groups/{i:02}"),
                    "groupKey": {"id": format!("{}@example.com", name.to_lowercase())},
                    "parent": format!("customers/{CUSTOMER_ID}"),
                    "displayName": name,
                })
            })
            .collect();
        self.respond(
            "/v1/groups",
            http::StatusCode::OK,
            serde_json::json!({ "groups": groups }).to_string(),
        )
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.uri.path() == path)
            .collect()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_string();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or((http::StatusCode::NOT_FOUND, "not found".to_string()));

        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from(body))?)
    }
}

pub fn create_test_context(http: MockHttpSend) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(http)
        .with_env(StaticEnv::default())
}

/// Write `content` as a credential file and build a config pointing to it.
pub fn write_config(content: &str, delegated_user: &str) -> (TempDir, ServiceConfig) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("service_account.json");
    std::fs::write(&path, content).unwrap();

    let config = ServiceConfig::new(path.to_str().unwrap(), delegated_user, CUSTOMER_ID).unwrap();
    (dir, config)
}
