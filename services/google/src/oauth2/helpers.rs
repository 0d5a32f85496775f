//! OAuth2 helper functions for Google services

use http::{header::ACCEPT, header::CONTENT_TYPE, Method, StatusCode};
use log::error;
use serde::de::DeserializeOwned;

use cloudgroups_core::{time::now, Context, Error, Result};

use super::types::{ErrorResponse, TokenResponse};
use crate::credential::Token;

/// Send an OAuth2 form POST and parse the JSON response.
///
/// Every failure, including transport errors, is reported as a token acquisition error.
pub async fn oauth2_form_post<R: DeserializeOwned>(
    ctx: &Context,
    url: &str,
    form: &[(&str, &str)],
) -> Result<R> {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();

    let req = http::Request::builder()
        .method(Method::POST)
        .uri(url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .body(body.into_bytes().into())
        .map_err(|e| Error::token_acquisition("failed to build token request").with_source(e))?;

    let resp = ctx.http_send(req).await.map_err(|e| {
        Error::token_acquisition(format!("failed to get token: {e}")).with_source(e)
    })?;

    if resp.status() != StatusCode::OK {
        error!("OAuth2 request to {} failed: {:?}", url, resp.status());
        return Err(Error::token_acquisition(format!(
            "failed to get token ({}): {}",
            resp.status(),
            describe_error(resp.body())
        )));
    }

    serde_json::from_slice(resp.body())
        .map_err(|e| Error::token_acquisition("failed to parse OAuth2 response").with_source(e))
}

/// Render an OAuth2 error body, preferring the structured `error` fields.
fn describe_error(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error,
            error_description: Some(desc),
        }) => format!("{error}: {desc}"),
        Ok(ErrorResponse { error, .. }) => error,
        Err(_) => String::from_utf8_lossy(body).to_string(),
    }
}

/// Convert a standard OAuth2 token response to our Token type.
///
/// Only bearer tokens are accepted. A lifetime that does not fit in a
/// timestamp is rejected.
pub fn token_from_response(resp: TokenResponse) -> Result<Token> {
    if let Some(token_type) = resp.token_type.as_deref() {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(Error::token_acquisition(format!(
                "unsupported token type: {token_type}"
            )));
        }
    }

    let expires_at = match resp.expires_in {
        None => None,
        Some(expires_in) => {
            let expires_at = i64::try_from(expires_in)
                .ok()
                .and_then(chrono::TimeDelta::try_seconds)
                .and_then(|delta| now().checked_add_signed(delta))
                .ok_or_else(|| {
                    Error::token_acquisition(format!(
                        "token lifetime out of range: expires_in = {expires_in}"
                    ))
                })?;
            Some(expires_at)
        }
    };

    Ok(Token {
        access_token: resp.access_token,
        expires_at,
    })
}
