//! Deterministic service doubles for unit and behaviour tests.
//!
//! None of these types touch the network. [`StubPredictionService`] answers
//! every call the same way, [`ScriptedPredictionService`] replays a queue of
//! outcomes with per-call latency, and [`StubDishCatalog`] serves a fixed
//! list of dishes.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::{DishCatalog, InputValues, PredictError, PredictionResult, PredictionService, SearchHit};

/// `PredictionService` returning one configured outcome for every call.
///
/// Calls are recorded so tests can assert on the submitted values.
#[derive(Debug)]
pub struct StubPredictionService {
    outcome: Result<PredictionResult, PredictError>,
    latency: Duration,
    calls: Mutex<Vec<InputValues>>,
}

impl StubPredictionService {
    /// Create a service that succeeds with `result`.
    #[must_use]
    pub fn with_result(result: PredictionResult) -> Self {
        Self::with_outcome(Ok(result))
    }

    /// Create a service that fails with `error`.
    #[must_use]
    pub fn with_error(error: PredictError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Create a service answering with `outcome`.
    #[must_use]
    pub fn with_outcome(outcome: Result<PredictionResult, PredictError>) -> Self {
        Self {
            outcome,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `latency` before answering each call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Values submitted so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<InputValues> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PredictionService for StubPredictionService {
    fn predict(&self, values: &InputValues) -> Result<PredictionResult, PredictError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*values);
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        self.outcome.clone()
    }
}

/// One queued answer of a [`ScriptedPredictionService`].
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    /// Time to wait before answering.
    pub latency: Duration,
    /// Outcome to return.
    pub outcome: Result<PredictionResult, PredictError>,
}

impl ScriptedResponse {
    /// A successful answer delivered after `latency`.
    #[must_use]
    pub const fn ok(latency: Duration, result: PredictionResult) -> Self {
        Self {
            latency,
            outcome: Ok(result),
        }
    }

    /// A failed answer delivered after `latency`.
    #[must_use]
    pub const fn err(latency: Duration, error: PredictError) -> Self {
        Self {
            latency,
            outcome: Err(error),
        }
    }
}

/// `PredictionService` replaying queued answers, one per call.
///
/// Useful for exercising request races: give the first call a long latency
/// and the second a short one and the second resolves first. Once the queue
/// is exhausted every call fails with a transport error.
#[derive(Debug)]
pub struct ScriptedPredictionService {
    script: Mutex<VecDeque<ScriptedResponse>>,
}

impl ScriptedPredictionService {
    /// Create a service answering calls with `script` in order.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PredictionService for ScriptedPredictionService {
    fn predict(&self, _values: &InputValues) -> Result<PredictionResult, PredictError> {
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(response) = next else {
            return Err(PredictError::Transport {
                url: "scripted://predict".to_owned(),
                message: "no scripted response remaining".to_owned(),
            });
        };
        if !response.latency.is_zero() {
            thread::sleep(response.latency);
        }
        response.outcome
    }
}

/// `DishCatalog` filtering a fixed list by case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct StubDishCatalog {
    dishes: Vec<SearchHit>,
    error: Option<PredictError>,
}

impl StubDishCatalog {
    /// Create a catalog holding `dishes`.
    #[must_use]
    pub fn with_dishes(dishes: Vec<SearchHit>) -> Self {
        Self {
            dishes,
            error: None,
        }
    }

    /// Create a catalog failing every non-blank search with `error`.
    #[must_use]
    pub fn with_error(error: PredictError) -> Self {
        Self {
            dishes: Vec::new(),
            error: Some(error),
        }
    }
}

impl DishCatalog for StubDishCatalog {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, PredictError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self
            .dishes
            .iter()
            .filter(|hit| hit.dish_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
