//! Error types emitted by the nutriscore CLI.
//!
//! Prediction failures are rendered into the view first; the command then
//! reports them here so the process exits non-zero.

use std::sync::Arc;

use nutriscore_core::{ParseStalePolicyError, PredictError};
use nutriscore_http::ServiceBuildError;
use thiserror::Error;

/// Errors emitted by the nutriscore CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set {field} on the command line or {env})")]
    MissingArgument {
        /// Argument name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The stale response policy is not recognised.
    #[error(transparent)]
    InvalidStalePolicy(#[from] ParseStalePolicyError),
    /// Constructing the HTTP service client failed.
    #[error("failed to build prediction service client for {base_url:?}: {source}")]
    BuildService {
        /// Configured service origin.
        base_url: String,
        /// Underlying construction failure.
        #[source]
        source: ServiceBuildError,
    },
    /// The prediction request failed; the view shows the same message.
    #[error("prediction failed: {message}")]
    PredictionFailed {
        /// Message shown in the error entry.
        message: String,
    },
    /// The dish search failed.
    #[error("search for {query:?} failed: {source}")]
    Search {
        /// Query that was sent.
        query: String,
        /// Underlying service failure.
        #[source]
        source: PredictError,
    },
    /// Encoding search results as JSON failed.
    #[error("failed to serialise search results: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
