//! `PredictionService` over HTTP using `reqwest`.
//!
//! Requests go to two fixed endpoints below the configured base URL:
//! `POST /api/predict` with a JSON body, and `GET /api/search?q=...`.
//! A non-success status becomes [`PredictError::Server`] carrying the
//! response body verbatim; a success body that does not decode becomes
//! [`PredictError::InvalidResponse`].

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use log::debug;
use nutriscore_core::{
    DishCatalog, InputValues, PREDICT_PATH, PredictError, PredictionResult, PredictionService,
    SEARCH_PATH, SearchHit,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use crate::wire::SearchResponse;

/// Error type for [`HttpPredictionService`] construction failures.
#[derive(Debug, Error)]
pub enum ServiceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default base URL; the prediction server listens here when run locally.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default user agent for service requests.
pub const DEFAULT_USER_AGENT: &str = "nutriscore-client/0.1";

/// Configuration for [`HttpPredictionService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpPredictionServiceConfig {
    /// Origin hosting the service (e.g., `"http://127.0.0.1:5000"`).
    pub base_url: String,
    /// Optional limit on connecting and on each whole request. `None` waits
    /// for as long as the operating system allows.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpPredictionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpPredictionServiceConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP client for the prediction service.
///
/// The service implements the synchronous [`PredictionService`] and
/// [`DishCatalog`] traits by blocking on asynchronous requests. It owns a
/// Tokio runtime that is reused across calls and may be shared between
/// threads; concurrent calls proceed independently.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, and inside a `current_thread` runtime, calls
/// block on the internal runtime. Inside a multi-threaded runtime (detected
/// via [`Handle::try_current()`] and [`RuntimeFlavor::MultiThread`]) calls
/// use that runtime's handle with [`tokio::task::block_in_place`] to avoid
/// nested runtime panics.
pub struct HttpPredictionService {
    client: Client,
    config: HttpPredictionServiceConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpPredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPredictionService")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpPredictionService {
    /// Create a new service client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceBuildError> {
        Self::with_config(HttpPredictionServiceConfig::new(base_url))
    }

    /// Create a new service client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpPredictionServiceConfig) -> Result<Self, ServiceBuildError> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder.build().map_err(ServiceBuildError::HttpClient)?;
        // Worker threads drive IO so several callers can block concurrently.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("nutriscore-http")
            .enable_all()
            .build()
            .map_err(ServiceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &HttpPredictionServiceConfig {
        &self.config
    }

    /// Build the absolute URL for an endpoint path.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn predict_async(&self, values: &InputValues) -> Result<PredictionResult, PredictError> {
        let url = self.endpoint_url(PREDICT_PATH);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(values)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let body = self.read_success_body(response, &url).await?;
        decode_body(&body, &url)
    }

    async fn search_async(&self, query: &str) -> Result<Vec<SearchHit>, PredictError> {
        let url = self.endpoint_url(SEARCH_PATH);
        debug!("GET {url}?q={query}");
        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let body = self.read_success_body(response, &url).await?;
        let parsed: SearchResponse = decode_body(&body, &url)?;
        Ok(parsed.results)
    }

    /// Read the body, failing with the body text when the status is not a
    /// success.
    async fn read_success_body(
        &self,
        response: Response,
        url: &str,
    ) -> Result<String, PredictError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(PredictError::Server {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Convert a reqwest error to a `PredictError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> PredictError {
        if error.is_timeout() {
            return PredictError::Timeout {
                url: url.to_owned(),
                timeout: self.config.timeout.unwrap_or_default(),
            };
        }

        PredictError::Transport {
            url: url.to_owned(),
            message: describe_transport_error(error),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Render a transport error with its causes, e.g. `error sending request
/// ...: connection refused`.
fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn decode_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, PredictError> {
    serde_json::from_str(body).map_err(|err| PredictError::InvalidResponse {
        url: url.to_owned(),
        message: format!("invalid response from {url}: {err}"),
    })
}

impl PredictionService for HttpPredictionService {
    fn predict(&self, values: &InputValues) -> Result<PredictionResult, PredictError> {
        self.block_on(self.predict_async(values))
    }
}

impl DishCatalog for HttpPredictionService {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, PredictError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        self.block_on(self.search_async(trimmed))
    }
}
