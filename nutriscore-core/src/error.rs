//! Failures reported by the prediction service seams and by parsing.

use std::time::Duration;

use thiserror::Error;

/// Message shown when the service fails without a response body.
pub const SERVER_ERROR_FALLBACK: &str = "Server error";

/// Errors from [`crate::PredictionService::predict`] and
/// [`crate::DishCatalog::search`].
///
/// The `Display` output is the message shown to the user in the error entry
/// of the match list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    /// The request could not be sent or the response could not be read.
    #[error("{message}")]
    Transport {
        /// Endpoint that was being contacted.
        url: String,
        /// Message reported by the transport.
        message: String,
    },
    /// The configured request timeout elapsed.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Endpoint that was being contacted.
        url: String,
        /// Configured request timeout.
        timeout: Duration,
    },
    /// The service answered with a non-success status.
    ///
    /// The body is surfaced verbatim; an empty body falls back to
    /// [`SERVER_ERROR_FALLBACK`].
    #[error("{}", server_message(.body))]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body text, possibly empty.
        body: String,
    },
    /// The service answered successfully but the body was not the expected
    /// JSON shape.
    #[error("{message}")]
    InvalidResponse {
        /// Endpoint that was being contacted.
        url: String,
        /// Decoder message describing the mismatch.
        message: String,
    },
}

fn server_message(body: &str) -> &str {
    if body.is_empty() {
        SERVER_ERROR_FALLBACK
    } else {
        body
    }
}

/// Returned when parsing a [`crate::Field`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field {name:?} (expected calories, protein, carbs or sugar)")]
pub struct UnknownFieldError {
    /// The rejected name.
    pub name: String,
}

/// Returned when parsing a [`crate::StalePolicy`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stale response policy {value:?} (expected discard or apply)")]
pub struct ParseStalePolicyError {
    /// The rejected value.
    pub value: String,
}
