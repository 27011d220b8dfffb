//! HTTP transport for the nutriscore prediction service.
//!
//! This crate provides [`HttpPredictionService`], an implementation of
//! [`nutriscore_core::PredictionService`] and [`nutriscore_core::DishCatalog`]
//! that talks to the prediction service over HTTP.
//!
//! # Architecture
//!
//! The service traits are synchronous so the controller stays independent of
//! any runtime. The HTTP service bridges to `reqwest`'s async client by
//! blocking on a Tokio runtime it owns, or on the caller's multi-threaded
//! runtime when one is running.
//!
//! # Example
//!
//! ```no_run
//! use nutriscore_core::{InputValues, PredictionService};
//! use nutriscore_http::{HttpPredictionService, HttpPredictionServiceConfig};
//! use std::time::Duration;
//!
//! let config = HttpPredictionServiceConfig::new("http://127.0.0.1:5000")
//!     .with_timeout(Duration::from_secs(10));
//! let service = HttpPredictionService::with_config(config)?;
//!
//! let result = service.predict(&InputValues::new(250.0, 12.0, 30.0, 5.0))?;
//! println!("{} ({})", result.score, result.category);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod service;
mod wire;

pub use service::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpPredictionService, HttpPredictionServiceConfig,
    ServiceBuildError,
};
