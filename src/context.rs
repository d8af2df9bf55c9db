//! AppAPI request context
//!
//! Nextcloud's AppAPI forwards every request to the ExApp with a set of
//! identity headers. The same headers must be sent back on every call the
//! ExApp makes to Nextcloud, so they are captured once per request here.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use base64::Engine;
use base64::prelude::BASE64_URL_SAFE;
use reqwest::{Client, Method, RequestBuilder};

use crate::app::AppState;
use crate::error::AppError;

/// Identity of the AppAPI request currently being served
#[derive(Debug, Clone)]
pub struct ExAppContext {
    client: Client,
    nextcloud_url: String,
    pub aa_version: String,
    pub ex_app_id: String,
    pub ex_app_version: String,
    pub authorization_app_api: String,
    pub aa_request_id: String,
    pub user_id: String,
    pub secret: String,
}

/// Splits the decoded `AUTHORIZATION-APP-API` header into user id and secret
///
/// The header is URL-safe base64 of `user_id:secret`.
///
/// # Examples
/// ```
/// use exapp::context::decode_authorization;
///
/// let (user, secret) = decode_authorization("YWxpY2U6czNjcjN0").unwrap();
/// assert_eq!(user, "alice");
/// assert_eq!(secret, "s3cr3t");
/// ```
pub fn decode_authorization(header: &str) -> Result<(String, String), AppError> {
    let decoded = BASE64_URL_SAFE
        .decode(header)
        .map_err(|_| AppError::Context("authorization-app-api is not base64"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::Context("authorization-app-api is not utf-8"))?;
    let (user_id, secret) = decoded
        .split_once(':')
        .ok_or(AppError::Context("authorization-app-api has no user id"))?;

    Ok((user_id.to_string(), secret.to_string()))
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Context(name))
}

impl ExAppContext {
    pub fn from_headers(
        headers: &HeaderMap,
        client: Client,
        nextcloud_url: &str,
    ) -> Result<Self, AppError> {
        let authorization_app_api = header(headers, "authorization-app-api")?;
        let (user_id, secret) = decode_authorization(authorization_app_api)?;

        Ok(ExAppContext {
            client,
            nextcloud_url: nextcloud_url.trim_end_matches('/').to_string(),
            aa_version: header(headers, "aa-version")?.to_string(),
            ex_app_id: header(headers, "ex-app-id")?.to_string(),
            ex_app_version: header(headers, "ex-app-version")?.to_string(),
            authorization_app_api: authorization_app_api.to_string(),
            aa_request_id: header(headers, "aa-request-id")?.to_string(),
            user_id,
            secret,
        })
    }

    /// Starts a request to `endpoint` on Nextcloud carrying the AppAPI headers
    pub fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.nextcloud_url, endpoint))
            .header("AA-VERSION", &self.aa_version)
            .header("EX-APP-ID", &self.ex_app_id)
            .header("EX-APP-VERSION", &self.ex_app_version)
            .header("AUTHORIZATION-APP-API", &self.authorization_app_api)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ExAppContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        ExAppContext::from_headers(&parts.headers, state.client, &state.config.nextcloud_url)
    }
}
