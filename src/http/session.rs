//! Per-scenario HTTP session
//!
//! An [`ApiSession`] owns a reqwest client with its own cookie jar, so any
//! credential the server issues is carried across the calls of one scenario
//! and dropped with it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{header, Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::common::{Error, Result};

use super::envelope;

/// Connection settings for a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// URL prefix every API path is appended to
    pub base_url: String,
    /// Accept self-signed TLS certificates
    pub accept_invalid_certs: bool,
    /// Per-request timeout, client default when `None`
    pub timeout: Option<Duration>,
}

impl SessionOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            accept_invalid_certs: false,
            timeout: None,
        }
    }
}

/// HTTP client scoped to one scenario
pub struct ApiSession {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: String,
    origin: Url,
}

impl ApiSession {
    /// Create a session with an empty cookie jar
    pub fn new(options: &SessionOptions) -> Result<Self> {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url).map_err(|e| Error::invalid_url(&base_url, e))?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(Error::invalid_url(&base_url, "scheme must be http or https"));
        }

        let jar = Arc::new(Jar::default());
        let mut builder = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .danger_accept_invalid_certs(options.accept_invalid_certs);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            jar,
            base_url,
            origin,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET request to an API path such as `/api/Menu`
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None::<&()>).await
    }

    /// Send a POST request with a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|e| self.classify(e))?;

        debug!(%method, %url, status, "received response");
        trace!(body = %body, "response body");

        Ok(ApiResponse {
            status,
            location,
            body,
        })
    }

    fn classify(&self, e: reqwest::Error) -> Error {
        if e.is_connect() || e.is_timeout() {
            Error::Connectivity {
                base_url: self.base_url.clone(),
                source: e,
            }
        } else {
            Error::Http(e)
        }
    }

    /// Names of the cookies the server has issued to this session
    pub fn cookie_names(&self) -> Vec<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|header| header.to_str().ok().map(str::to_string))
            .map(|header| parse_cookie_names(&header))
            .unwrap_or_default()
    }

    /// Whether a cookie whose name starts with `prefix` was issued
    pub fn has_cookie_with_prefix(&self, prefix: &str) -> bool {
        self.cookie_names().iter().any(|name| name.starts_with(prefix))
    }
}

/// Split a `Cookie` header value into cookie names
fn parse_cookie_names(header: &str) -> Vec<String> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('=').map(|(name, _)| name.trim().to_string()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Buffered response of one API call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    location: Option<String>,
    body: String,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw body text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Value of the `Location` header, if any
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Fail with an unexpected status error unless the status matches
    pub fn expect_status(self, step: &str, expected: u16) -> Result<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(Error::unexpected_status(step, expected, self.status, &self.body))
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse the body as a collection, unwrapping reference envelopes
    pub fn json_values(&self) -> Result<Vec<Value>> {
        Ok(envelope::into_values(self.json()?))
    }

    /// Identifier of a created resource
    ///
    /// Prefers a non-empty `id` field in the body, then falls back to the
    /// path segment after `collection_path` in the `Location` header.
    pub fn created_id(&self, collection_path: &str) -> Option<String> {
        self.json()
            .ok()
            .as_ref()
            .and_then(id_field)
            .or_else(|| {
                self.location()
                    .and_then(|location| id_from_location(location, collection_path))
            })
    }
}

/// Read a usable identifier from a body's `id` field
///
/// Missing, null, empty and zero identifiers are not usable.
pub fn id_field(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Extract the identifier following `collection_path` in a location
///
/// `https://host/api/Orders/12?x=1` with `/api/Orders/` yields `12`.
pub fn id_from_location(location: &str, collection_path: &str) -> Option<String> {
    let (_, rest) = location.split_once(collection_path)?;
    let id = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
