//! Core domain types for the nutriscore prediction client.
//!
//! The crate models the client side of a nutritional-score prediction
//! service: the four form inputs, the service's response, the view regions
//! a front end renders, and the [`PredictionController`] that owns those
//! regions and drives one request/response cycle per submission.
//!
//! Transports live elsewhere and plug in through [`PredictionService`] and
//! [`DishCatalog`].
//!
//! # Examples
//!
//! ```
//! use nutriscore_core::{
//!     FormFields, InputValues, PredictError, PredictionController, PredictionResult,
//!     PredictionService,
//! };
//!
//! struct FixedService;
//!
//! impl PredictionService for FixedService {
//!     fn predict(&self, _values: &InputValues) -> Result<PredictionResult, PredictError> {
//!         Ok(PredictionResult::new(87.5, "Healthy", Vec::new()))
//!     }
//! }
//!
//! let mut controller = PredictionController::new(FormFields::new("250", "12", "30", "4"));
//! let values = controller.collect_values();
//! controller.submit(&FixedService, values);
//! assert_eq!(controller.view().score_text, "87.50");
//! assert_eq!(controller.view().meter.percent(), 88);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod controller;
mod error;
mod input;
mod prediction;
mod service;
mod view;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(all(docsrs, not(test)), doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use controller::{Completion, PendingPrediction, PredictionController, RequestTicket};
pub use error::{ParseStalePolicyError, PredictError, SERVER_ERROR_FALLBACK, UnknownFieldError};
pub use input::{Field, FormFields, InputValues, coerce_number};
pub use prediction::{Match, PredictionResult, SearchHit};
pub use service::{DishCatalog, PredictionService, StalePolicy};
pub use view::{
    ERROR_LABEL, IDLE_LABEL, ListItem, LOADING_FILL, LOADING_LABEL, LOADING_SCORE, MATCH_STAGGER,
    MeterFill, NO_MATCHES, RenderedMatch, SCORE_PLACEHOLDER, ViewState, format_score,
};

/// Path of the prediction endpoint, relative to the service origin.
pub const PREDICT_PATH: &str = "/api/predict";

/// Path of the dish search endpoint, relative to the service origin.
pub const SEARCH_PATH: &str = "/api/search";
