//! Facade crate for the nutriscore prediction client.
//!
//! This crate re-exports the core domain types and exposes the HTTP service
//! client behind the `http` feature.

#![forbid(unsafe_code)]

pub use nutriscore_core::{
    Completion, DishCatalog, Field, FormFields, InputValues, ListItem, Match, MeterFill,
    PendingPrediction, PredictError, PredictionController, PredictionResult, PredictionService,
    RenderedMatch, RequestTicket, SearchHit, StalePolicy, ViewState, coerce_number, format_score,
};

#[cfg(feature = "http")]
pub use nutriscore_http::{HttpPredictionService, HttpPredictionServiceConfig, ServiceBuildError};

#[cfg(feature = "test-support")]
pub use nutriscore_core::test_support;
