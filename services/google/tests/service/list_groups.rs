use cloudgroups_core::{ErrorKind, Result};
use cloudgroups_google::{list_groups, new_service_without_delegation, ListGroupsRequest};
use http::StatusCode;
use pretty_assertions::assert_eq;

use super::*;

#[tokio::test]
async fn test_list_groups_prints_in_order() -> Result<()> {
    let http = MockHttpSend::new()
        .with_token()
        .with_groups(&["Engineering", "Sales"]);
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await?;

    let mut out = Vec::new();
    list_groups(&client, CUSTOMER_ID, 10, &mut out).await?;
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Group: Engineering\nGroup: Sales\n"
    );

    let reqs = http.requests_to("/v1/groups");
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, http::Method::GET);
    assert_eq!(req.uri.host(), Some("cloudidentity.googleapis.com"));

    let query: HashMap<String, String> = form_urlencoded::parse(req.uri.query().unwrap().as_bytes())
        .into_owned()
        .collect();
    assert_eq!(query["parent"], "customers/C03ygpcl8");
    assert_eq!(query["view"], "BASIC");
    assert_eq!(query["pageSize"], "10");

    assert_eq!(
        req.headers[http::header::AUTHORIZATION],
        format!("Bearer {ACCESS_TOKEN}").as_str()
    );
    Ok(())
}

#[tokio::test]
async fn test_list_groups_reuses_token() -> Result<()> {
    let http = MockHttpSend::new()
        .with_token()
        .with_groups(&["Engineering"]);
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await?;

    let mut out = Vec::new();
    list_groups(&client, CUSTOMER_ID, 10, &mut out).await?;
    list_groups(&client, CUSTOMER_ID, 10, &mut out).await?;

    assert_eq!(http.requests_to("/token").len(), 1);
    assert_eq!(http.requests_to("/v1/groups").len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_list_groups_empty_and_paged() -> Result<()> {
    let http = MockHttpSend::new().with_token().respond(
        "/v1/groups",
        StatusCode::OK,
        r#"{"groups": [{"name": "groups/01", "displayName": "Engineering"}], "nextPageToken": "page-2"}"#,
    );
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await?;

    // Only the first page is fetched.
    let mut out = Vec::new();
    list_groups(&client, CUSTOMER_ID, 1, &mut out).await?;
    assert_eq!(String::from_utf8(out).unwrap(), "Group: Engineering\n");
    assert_eq!(http.requests_to("/v1/groups").len(), 1);

    let http = MockHttpSend::new().with_token().with_groups(&[]);
    let ctx = create_test_context(http);
    let client = new_service_without_delegation(&ctx, &config).await?;

    let mut out = Vec::new();
    list_groups(&client, CUSTOMER_ID, 10, &mut out).await?;
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_groups_forbidden() {
    let http = MockHttpSend::new().with_token().respond(
        "/v1/groups",
        StatusCode::FORBIDDEN,
        r#"{"error": {"code": 403, "message": "Not Authorized to access this resource/api", "status": "PERMISSION_DENIED"}}"#,
    );
    let ctx = create_test_context(http);
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await.unwrap();

    let mut out = Vec::new();
    let err = list_groups(&client, CUSTOMER_ID, 10, &mut out)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListFailed);
    assert!(err.to_string().contains("PERMISSION_DENIED"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_list_groups_token_failure() {
    let http = MockHttpSend::new()
        .respond("/token", StatusCode::UNAUTHORIZED, r#"{"error": "invalid_grant"}"#)
        .with_groups(&["Engineering"]);
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await.unwrap();

    let mut out = Vec::new();
    let err = list_groups(&client, CUSTOMER_ID, 10, &mut out)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListFailed);
    assert!(err.to_string().contains("invalid_grant"));
    assert!(http.requests_to("/v1/groups").is_empty());
}

#[tokio::test]
async fn test_list_groups_token_lifetime_out_of_range() {
    let http = MockHttpSend::new()
        .respond(
            "/token",
            StatusCode::OK,
            serde_json::json!({"access_token": ACCESS_TOKEN, "expires_in": u64::MAX}).to_string(),
        )
        .with_groups(&["Engineering"]);
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await.unwrap();

    let mut out = Vec::new();
    let err = list_groups(&client, CUSTOMER_ID, 10, &mut out)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListFailed);
    assert!(http.requests_to("/v1/groups").is_empty());
}

#[tokio::test]
async fn test_list_groups_malformed_response() {
    let http = MockHttpSend::new()
        .with_token()
        .respond("/v1/groups", StatusCode::OK, "<html>");
    let ctx = create_test_context(http);
    let (_dir, config) = write_config(TEST_CREDENTIAL, "");
    let client = new_service_without_delegation(&ctx, &config).await.unwrap();

    let err = client
        .list_groups(&ListGroupsRequest::for_customer(CUSTOMER_ID))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ListFailed);
}
