//! Raw HTTP verbs against the backing store.
//!
//! The [`Transport`] trait is the seam the resource clients are built on; it is
//! passed to them explicitly so tests can substitute it. [`HttpTransport`] is
//! the reqwest implementation. No retries happen at this layer.

use std::{future::Future, time::Duration};

use reqwest::{RequestBuilder, Url};
use serde_json::Value;

use crate::error::TransportError;

pub trait Transport: Clone + Send + Sync + 'static {
    /// GET `path`, decoding the body as JSON.
    fn get(&self, path: &str) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// POST a JSON body to `path`, decoding the response as JSON.
    fn post(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// PUT a JSON body to `path`; the response body is not read.
    fn put(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn delete(&self, path: &str) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, TransportError> {
        // Without the trailing slash `Url::join` would drop the last segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| TransportError::InvalidUrl(format!("{base_url}: {err}")))?;
        Ok(Self { base_url, http })
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| TransportError::InvalidUrl(format!("{path}: {err}")))
    }

    async fn send(
        &self,
        method: &str,
        url: Url,
        request: RequestBuilder,
    ) -> Result<String, TransportError> {
        tracing::debug!("{method} {url}");

        let res = request.send().await.map_err(|err| {
            tracing::warn!("{method} {url} failed: {err}");
            TransportError::Network(err)
        })?;

        let status = res.status();
        let body = res.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!("{method} {url} answered {status}");
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// An empty success body decodes to `null`.
fn decode(body: &str) -> Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|err| TransportError::Decode(err.to_string()))
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let url = self.endpoint(path)?;
        let body = self.send("GET", url.clone(), self.http.get(url)).await?;
        decode(&body)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let url = self.endpoint(path)?;
        let body = self
            .send("POST", url.clone(), self.http.post(url).json(body))
            .await?;
        decode(&body)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<(), TransportError> {
        let url = self.endpoint(path)?;
        self.send("PUT", url.clone(), self.http.put(url).json(body))
            .await
            .map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), TransportError> {
        let url = self.endpoint(path)?;
        self.send("DELETE", url.clone(), self.http.delete(url))
            .await
            .map(|_| ())
    }
}

#[derive(Default, Debug)]
pub struct HttpTransportBuilder {
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    pub fn base_url(mut self, base_url: &str) -> HttpTransportBuilder {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> HttpTransportBuilder {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        HttpTransport::with_client(http, &self.base_url)
    }
}
