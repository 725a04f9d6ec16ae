use std::{fmt, future::Future, time::Duration};

use serde_json::Value;

use crate::{error::ClientError, sync::payload::Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, PartialEq)]
pub struct Request {
    pub route: Route,
    pub body: Option<Value>,
    /// Bearer credential for authenticated routes.
    pub credential: Option<String>,
}

/// Bodies carry passwords, so only their top-level field names are printed.
impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body_fields = self.body.as_ref().map(|body| match body {
            Value::Object(fields) => fields.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        });
        f.debug_struct("Request")
            .field("route", &self.route.path)
            .field("method", &self.route.method)
            .field("body_fields", &body_fields)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Whatever the server answered. Non-2xx statuses are still responses; only
/// failing to get an answer at all is an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    /// Parses a raw body. An empty body is `null`. A failure status whose
    /// body is not JSON (a proxy error page, say) is also `null`, so it reads
    /// as a connection problem rather than a malformed payload.
    pub fn from_text(status: u16, text: &str) -> Result<Self, ClientError> {
        let mut response = Self {
            status,
            body: Value::Null,
        };
        if text.trim().is_empty() {
            return Ok(response);
        }
        match serde_json::from_str(text) {
            Ok(body) => response.body = body,
            Err(err) if response.is_success() => return Err(err.into()),
            Err(_) => {}
        }
        Ok(response)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, ClientError>>;
}

/// JSON over HTTP against the backend's base URL.
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bugtrack/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ClientError::Connection(format!("failed to initialize HTTP client: {err}"))
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, request.route.path);
        let mut builder = match request.route.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(credential) = &request.credential {
            builder = builder.bearer_auth(credential);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| {
                ClientError::Connection(format!("{} failed: {err}", request.route.path))
            })?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| ClientError::Connection(format!("failed to read response: {err}")))?;
        Response::from_text(status, &text)
    }
}
