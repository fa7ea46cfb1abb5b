//! HTTP client for outbound requests.

use std::collections::HashMap;
use std::time::Duration;

use crate::dependency::Dependency;
use crate::request::{Method, RequestBuilder};
use crate::response::Response;
use crate::FetchError;

/// HTTP client for making outbound requests.
///
/// A thin wrapper around `reqwest::Client` with a base URL, default
/// headers and a default timeout. Cloning is cheap; the connection pool is
/// shared.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    default_timeout: Duration,
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("draft-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: None,
            default_headers: HashMap::new(),
            default_timeout: Duration::from_secs(10),
        })
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Timeout for requests that do not set their own.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let full_url = self.resolve(url.into());

        let mut builder = RequestBuilder::new(method, full_url).timeout(self.default_timeout);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            http: self.http.clone(),
            builder,
        }
    }

    fn resolve(&self, url: String) -> String {
        match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    http: reqwest::Client,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Override the client's default timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Use a dependency's timeout, or `configured` when given.
    pub fn for_dependency(self, dependency: Dependency, configured: Option<Duration>) -> Self {
        self.timeout(configured.unwrap_or_else(|| dependency.default_timeout()))
    }

    /// The request as built so far.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and return the response.
    ///
    /// Non-2xx statuses are returned as responses, not errors; use
    /// [`Response::error_for_status`] to convert.
    pub async fn send(self) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            headers,
            body,
            timeout,
        } = self.builder;

        let mut request = self.http.request(method.to_reqwest(), &url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(method = method.as_str(), %url, status, "upstream response");

        Ok(Response::new(status, body))
    }
}
