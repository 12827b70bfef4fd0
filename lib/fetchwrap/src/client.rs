//! Base fetch implementation using hyper-util.

use std::collections::HashMap;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower_service::Service;
use tracing::{Instrument, debug, debug_span};

use crate::{
    Body, Error, Fetch, FetchFuture, FetchOptions, FetchRequest, JSON_CONTENT_TYPE, Reply,
    Response, Result, connector::https_connector,
};

/// Timeouts and pool settings of a [`HyperFetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-exchange timeout, response body included.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// How long an idle connection stays in the pool.
    pub pool_idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

/// HTTP base fetch using hyper-util with connection pooling and TLS.
///
/// Resolves every request to [`Reply::Response`]: the status is not checked
/// and the body is not decoded. That is the job of middlewares such as
/// [`ReceiveJson`](crate::middleware::ReceiveJson).
///
/// # Example
///
/// ```ignore
/// use fetchwrap::{FetchWrap, HyperFetch};
/// use std::time::Duration;
///
/// let base = HyperFetch::builder().timeout(Duration::from_secs(5)).build();
/// let fetch = FetchWrap::builder(base).build();
/// ```
#[derive(Clone)]
pub struct HyperFetch {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperFetch")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperFetch {
    /// Create a base fetch with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a base fetch with custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Start configuring a base fetch.
    #[must_use]
    pub fn builder() -> HyperFetchBuilder {
        HyperFetchBuilder::default()
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a hyper request from a URL and fetch options.
    fn build_hyper_request(url: &str, options: &FetchOptions) -> Result<http::Request<Full<Bytes>>> {
        let url = url::Url::parse(url)?;

        let mut builder = http::Request::builder()
            .method(http::Method::from(options.method_or_default()))
            .uri(url.as_str());

        for (name, value) in options.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match options.body() {
            None => Full::default(),
            Some(Body::Text(text)) => Full::new(Bytes::from(text.clone())),
            Some(Body::Json(json)) => {
                let has_content_type = options
                    .headers()
                    .keys()
                    .any(|name| name.eq_ignore_ascii_case("content-type"));
                if !has_content_type {
                    builder = builder.header(http::header::CONTENT_TYPE, JSON_CONTENT_TYPE);
                }
                Full::new(Bytes::from(json.to_json_string()?))
            }
        };

        builder
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    /// Extract response headers as a `HashMap`.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, url: String, options: FetchOptions) -> Result<Response> {
        let method = options.method_or_default();
        let span = debug_span!("http_request", %method, %url);

        async move {
            let hyper_request = Self::build_hyper_request(&url, &options)?;
            debug!(headers = ?options.headers(), "sending request");

            let exchange = async {
                let response = self
                    .inner
                    .request(hyper_request)
                    .await
                    .map_err(Self::map_hyper_error)?;

                let status = response.status().as_u16();
                let response_headers = Self::extract_headers(response.headers());

                let body = response
                    .into_body()
                    .collect()
                    .await
                    .map_err(|e| Error::connection(e.to_string()))?
                    .to_bytes();

                Ok::<_, Error>(Response::new(status, response_headers, body))
            };

            let response = tokio::time::timeout(self.config.timeout, exchange)
                .await
                .map_err(|_| Error::Timeout)??;

            debug!(status = response.status(), "response received");
            Ok::<_, Error>(response)
        }
        .instrument(span)
        .await
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HyperFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HyperFetch {
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        let client = self.clone();
        Box::pin(async move { client.execute(url, options).await.map(Reply::Response) })
    }
}

impl Service<FetchRequest> for HyperFetch {
    type Response = Reply;
    type Error = Error;
    type Future = FetchFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: FetchRequest) -> Self::Future {
        let (url, options) = request.into_parts();
        self.fetch(url, options)
    }
}

/// Builder for [`HyperFetch`], starting from [`ClientConfig::default`].
#[derive(Debug, Clone, Default)]
pub struct HyperFetchBuilder {
    config: ClientConfig,
}

impl HyperFetchBuilder {
    /// Set the whole-exchange timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config.pool_idle_per_host = count;
        self
    }

    /// Set how long idle connections are kept.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Build the base fetch.
    #[must_use]
    pub fn build(self) -> HyperFetch {
        HyperFetch::with_config(self.config)
    }
}
