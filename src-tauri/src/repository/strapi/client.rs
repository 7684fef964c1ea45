//! Strapi HTTP Client
//!
//! Shared reqwest client, bearer token and the `{data: ...}` envelope used by
//! every collection endpoint. Non-success responses are mapped onto
//! `DomainError` with the backend's own message when it sends one.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::config::ConsoleConfig;
use crate::domain::{DomainError, DomainResult};

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
struct DataBody<'a, T: Serialize> {
    data: &'a T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Cheap to clone; clones share the token.
#[derive(Clone)]
pub struct StrapiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl StrapiClient {
    pub fn new(config: &ConsoleConfig) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| DomainError::Internal(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request builder carrying the bearer token, if signed in
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("[api] {} /{}", method, path.trim_start_matches('/'));
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Unauthenticated request (login)
    pub(crate) fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("[api] {} /{}", method, path.trim_start_matches('/'));
        self.http.request(method, self.url(path))
    }

    /// Send and fail on any non-success status
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> DomainResult<Response> {
        let response = builder.send().await.map_err(|e| {
            log::error!("[api] request failed: {}", e);
            DomainError::Backend(e.to_string())
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = status_error(status, &body);
        log::warn!("[api] {} -> {}", status, err);
        Err(err)
    }

    pub(crate) async fn send<R: DeserializeOwned>(&self, builder: RequestBuilder) -> DomainResult<R> {
        self.execute(builder)
            .await?
            .json::<R>()
            .await
            .map_err(|e| DomainError::Backend(format!("unexpected response: {}", e)))
    }

    pub(crate) async fn get_data<R: DeserializeOwned>(&self, path: &str) -> DomainResult<R> {
        let envelope: DataEnvelope<R> = self.send(self.request(Method::GET, path)).await?;
        Ok(envelope.data)
    }

    /// POST/PUT `{data: draft}` and unwrap the returned record
    pub(crate) async fn write_data<D, R>(&self, method: Method, path: &str, draft: &D) -> DomainResult<R>
    where
        D: Serialize,
        R: DeserializeOwned,
    {
        let builder = self.request(method, path).json(&DataBody { data: draft });
        let envelope: DataEnvelope<R> = self.send(builder).await?;
        Ok(envelope.data)
    }

    pub(crate) async fn delete(&self, path: &str) -> DomainResult<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Escape a document id for use as a path segment
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Map a non-success status onto the domain taxonomy
pub(crate) fn status_error(status: StatusCode, body: &str) -> DomainError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    match status {
        StatusCode::BAD_REQUEST => DomainError::InvalidInput(message),
        StatusCode::UNAUTHORIZED => DomainError::Unauthorized(message),
        StatusCode::FORBIDDEN => DomainError::Forbidden(format!(
            "{} (check the backend's role permissions)",
            message
        )),
        StatusCode::NOT_FOUND => DomainError::NotFound(message),
        _ => DomainError::Backend(format!("{}: {}", status.as_u16(), message)),
    }
}
