use http::header;
use log::debug;

use cloudgroups_core::{Context, Error, Result, SignRequest, SigningCredential};

use crate::credential::Token;

/// RequestSigner authorizes Google API requests with a bearer token.
#[derive(Debug, Default)]
pub struct RequestSigner;

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Token;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut http::request::Parts,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let token = credential
            .ok_or_else(|| Error::token_acquisition("no access token available"))?;
        if !token.is_valid() {
            return Err(Error::token_acquisition("access token is expired"));
        }

        debug!("authorizing {} {}", req.method, req.uri);

        let mut value: http::HeaderValue = format!("Bearer {}", &token.access_token).parse()?;
        value.set_sensitive(true);
        req.headers.insert(header::AUTHORIZATION, value);

        Ok(())
    }
}
