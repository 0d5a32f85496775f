use cloudgroups_core::{ErrorKind, Result};
use cloudgroups_google::{new_service_with_delegation, new_service_without_delegation};

use super::*;

#[tokio::test]
async fn test_without_delegation_has_no_subject() -> Result<()> {
    let http = MockHttpSend::new().with_token().with_groups(&["Engineering"]);
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, ADMIN_USER);

    let client = new_service_without_delegation(&ctx, &config).await?;
    assert_eq!(client.subject(), None);
    // Construction does not touch the network.
    assert!(http.requests().is_empty());

    let mut out = Vec::new();
    cloudgroups_google::list_groups(&client, CUSTOMER_ID, 10, &mut out).await?;

    let claims = http.requests_to("/token")[0].assertion_claims();
    assert_eq!(claims.get("sub"), None);
    assert_eq!(
        claims["scope"],
        "https://www.googleapis.com/auth/cloud-identity.groups"
    );
    Ok(())
}

#[tokio::test]
async fn test_with_delegation_sets_subject() -> Result<()> {
    let http = MockHttpSend::new().with_token().with_groups(&["Engineering"]);
    let ctx = create_test_context(http.clone());
    let (_dir, config) = write_config(TEST_CREDENTIAL, ADMIN_USER);

    let client = new_service_with_delegation(&ctx, &config).await?;
    assert_eq!(client.subject(), Some(ADMIN_USER));
    assert!(http.requests().is_empty());

    let mut out = Vec::new();
    cloudgroups_google::list_groups(&client, CUSTOMER_ID, 10, &mut out).await?;

    let claims = http.requests_to("/token")[0].assertion_claims();
    assert_eq!(claims["sub"], ADMIN_USER);
    assert_eq!(
        claims["scope"],
        config.scopes().join(" ").as_str()
    );
    Ok(())
}

#[tokio::test]
async fn test_with_delegation_requires_user() {
    let ctx = create_test_context(MockHttpSend::new());
    let (dir, config) = write_config(TEST_CREDENTIAL, "");

    // The user is checked before the file is read.
    std::fs::remove_file(dir.path().join("service_account.json")).unwrap();

    let err = new_service_with_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingDelegationTarget);
}

#[tokio::test]
async fn test_removed_credential_fails_before_http() {
    let http = MockHttpSend::new().with_token().with_groups(&["Engineering"]);
    let ctx = create_test_context(http.clone());
    let (dir, config) = write_config(TEST_CREDENTIAL, ADMIN_USER);

    std::fs::remove_file(config.credential_path()).unwrap();

    let err = new_service_without_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadFailed);

    let err = new_service_with_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReadFailed);

    assert!(http.requests().is_empty());
    drop(dir);
}

#[tokio::test]
async fn test_malformed_credential_kinds() {
    let ctx = create_test_context(MockHttpSend::new());
    let content = r#"{"type": "authorized_user", "client_id": "id", "client_secret": "secret", "refresh_token": "token"}"#;
    let (_dir, config) = write_config(content, ADMIN_USER);

    let err = new_service_without_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientConstruction);

    let err = new_service_with_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailed);
}

#[tokio::test]
async fn test_invalid_endpoint() {
    let ctx = create_test_context(MockHttpSend::new());
    let (_dir, config) = write_config(TEST_CREDENTIAL, ADMIN_USER);
    let config = config.with_endpoint("not an endpoint");

    let err = new_service_without_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientConstruction);

    let err = new_service_with_delegation(&ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientConstruction);
}
