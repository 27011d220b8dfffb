//! Seams between the controller and whatever transport reaches the service.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseStalePolicyError;
use crate::{InputValues, PredictError, PredictionResult, SearchHit};

/// Fetch a prediction for a set of input values.
///
/// Implementations perform exactly one request per call and never retry.
///
/// # Examples
///
/// ```rust
/// use nutriscore_core::{InputValues, PredictError, PredictionResult, PredictionService};
///
/// struct Unavailable;
///
/// impl PredictionService for Unavailable {
///     fn predict(&self, _values: &InputValues) -> Result<PredictionResult, PredictError> {
///         Err(PredictError::Server { status: 503, body: String::new() })
///     }
/// }
///
/// let err = Unavailable.predict(&InputValues::default()).unwrap_err();
/// assert_eq!(err.to_string(), "Server error");
/// ```
pub trait PredictionService {
    /// Submit `values` and return the decoded response.
    fn predict(&self, values: &InputValues) -> Result<PredictionResult, PredictError>;
}

/// Look up reference dishes by name.
pub trait DishCatalog {
    /// Return dishes whose name contains `query`, in service order.
    ///
    /// Implementations return an empty list for a blank query.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, PredictError>;
}

/// What the controller does with an outcome that is no longer the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum StalePolicy {
    /// Only the latest issued request may update the view.
    #[default]
    Discard,
    /// Every outcome is applied; whichever resolves last wins.
    Apply,
}

impl StalePolicy {
    /// Name used in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Discard => "discard",
            Self::Apply => "apply",
        }
    }
}

impl fmt::Display for StalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StalePolicy {
    type Err = ParseStalePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "apply" => Ok(Self::Apply),
            _ => Err(ParseStalePolicyError {
                value: s.to_owned(),
            }),
        }
    }
}
