//! HTTP call shape shared by both providers.
//!
//! Both providers send a bearer token on every request and map statuses the
//! same way; they differ only in where the bearer comes from.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

use autosaver_oauth::OAuthSession;

use crate::error::{Error, Result};
use crate::types::SaveResult;

/// Where the bearer token comes from.
pub(crate) enum Credential {
    /// Long-lived token from configuration.
    Static(String),
    /// Token held, and refreshed as needed, by an OAuth session.
    Session(OAuthSession),
}

impl Credential {
    async fn bearer(&self) -> Result<String> {
        match self {
            Credential::Static(token) => Ok(token.clone()),
            Credential::Session(session) => Ok(session.access_token().await?),
        }
    }
}

/// Request payload.
#[derive(Clone, Copy)]
pub(crate) enum RequestBody<'a> {
    Empty,
    Query(&'a [(&'a str, &'a str)]),
    Json(&'a Value),
    Form(&'a [(&'a str, String)]),
}

/// Build the HTTP client both the API calls and the token endpoint use.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let user_agent = format!("autosaver/{}", env!("CARGO_PKG_VERSION"));
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}

/// Authenticated client for one provider API.
pub(crate) struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credential: Credential,
}

impl ApiClient {
    pub(crate) fn new(http: reqwest::Client, base_url: &str, credential: Credential) -> Result<Self> {
        // Normalize so relative joins keep any path prefix.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            http,
            base_url,
            credential,
        })
    }

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(Error::from)
    }

    /// Send a request with the current bearer token.
    ///
    /// With an OAuth credential, a 401 triggers one token refresh and one
    /// resend of the identical request.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody<'_>,
    ) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        let mut refreshed = false;

        loop {
            let token = self.credential.bearer().await?;
            let request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(token);
            let request = match body {
                RequestBody::Empty => request,
                RequestBody::Query(query) => request.query(query),
                RequestBody::Json(json) => request.json(json),
                RequestBody::Form(form) => request.form(form),
            };

            tracing::debug!("{} {}", method, url.path());
            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED
                && !refreshed
                && let Credential::Session(session) = &self.credential
            {
                tracing::info!("Access token rejected, refreshing and resending");
                session.refresh().await?;
                refreshed = true;
                continue;
            }

            return Ok(response);
        }
    }

    /// GET a JSON document.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let body = if query.is_empty() {
            RequestBody::Empty
        } else {
            RequestBody::Query(query)
        };
        let response = self.send(Method::GET, path, body).await?;
        handle_response(response).await
    }

    /// PUT a deposit and judge the outcome.
    pub(crate) async fn put_deposit(&self, path: &str, body: RequestBody<'_>) -> Result<SaveResult> {
        let response = self.send(Method::PUT, path, body).await?;
        deposit_result(response).await
    }
}

/// Handle a response, extracting the body or error.
async fn handle_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(extract_error(response).await)
    }
}

/// Turn a deposit response into a [`SaveResult`].
///
/// Credential and missing-goal statuses stay errors; every other answer,
/// server errors included, is the provider's verdict on the deposit.
async fn deposit_result(response: reqwest::Response) -> Result<SaveResult> {
    let status = response.status();
    if matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    ) {
        return Err(extract_error(response).await);
    }

    let text = response.text().await?;
    let raw = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok(SaveResult::from_response(status.as_u16(), raw))
}

/// Extract an error from a failed response.
async fn extract_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("HTTP {} from {}", status.as_u16(), url)
    } else {
        body
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        _ => Error::Status {
            status: status.as_u16(),
            message,
        },
    }
}
