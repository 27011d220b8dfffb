//! Service doubles and output helpers shared by the CLI tests.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use nutriscore_core::test_support::{StubDishCatalog, StubPredictionService};
use nutriscore_core::{
    DishCatalog, InputValues, Match, PredictError, PredictionResult, PredictionService, SearchHit,
};
use nutriscore_http::HttpPredictionServiceConfig;

use crate::CliError;
use crate::client::{ServiceBuilder, SharedPredictionService};

/// Builder handing out fixed doubles and recording the requested configs.
pub(super) struct StubServiceBuilder {
    predictor: SharedPredictionService,
    catalog: StubDishCatalog,
    requested: Mutex<Vec<HttpPredictionServiceConfig>>,
}

impl StubServiceBuilder {
    pub(super) fn new(predictor: impl PredictionService + Send + Sync + 'static) -> Self {
        Self {
            predictor: Arc::new(predictor),
            catalog: StubDishCatalog::default(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn with_catalog(mut self, catalog: StubDishCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub(super) fn requested(&self) -> Vec<HttpPredictionServiceConfig> {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, config: &HttpPredictionServiceConfig) {
        self.requested
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
    }
}

impl ServiceBuilder for StubServiceBuilder {
    fn predictor(
        &self,
        config: &HttpPredictionServiceConfig,
    ) -> Result<SharedPredictionService, CliError> {
        self.record(config);
        Ok(Arc::clone(&self.predictor))
    }

    fn catalog(
        &self,
        config: &HttpPredictionServiceConfig,
    ) -> Result<Box<dyn DishCatalog>, CliError> {
        self.record(config);
        Ok(Box::new(self.catalog.clone()))
    }
}

/// Lets a test keep a handle on a stub after handing it to the builder.
pub(super) struct SharedStub(pub(super) Arc<StubPredictionService>);

impl PredictionService for SharedStub {
    fn predict(&self, values: &InputValues) -> Result<PredictionResult, PredictError> {
        self.0.predict(values)
    }
}

/// Calories at or above which [`CaloriesEchoService`] answers slowly.
pub(super) const SLOW_CALORIES: f64 = 500.0;

/// Echoes the submitted calories as score and label, delaying heavy meals.
pub(super) struct CaloriesEchoService {
    pub(super) slow_latency: Duration,
}

impl PredictionService for CaloriesEchoService {
    fn predict(&self, values: &InputValues) -> Result<PredictionResult, PredictError> {
        if values.calories >= SLOW_CALORIES {
            thread::sleep(self.slow_latency);
        }
        Ok(PredictionResult::new(
            values.calories,
            format!("calories {}", values.calories),
            Vec::new(),
        ))
    }
}

pub(super) fn healthy() -> PredictionResult {
    PredictionResult::new(87.5, "Healthy", Vec::new())
}

pub(super) fn with_matches() -> PredictionResult {
    PredictionResult::new(
        72.0,
        "Good",
        vec![
            Match::new("Garden Salad", 9.123, 120.0),
            Match::new("Cheeseburger", 3.4, 650.0),
        ],
    )
}

pub(super) fn invalid_input() -> PredictError {
    PredictError::Server {
        status: 400,
        body: "invalid input".to_owned(),
    }
}

pub(super) fn dishes() -> StubDishCatalog {
    StubDishCatalog::with_dishes(vec![
        SearchHit {
            dish_name: "Masala Dosa".to_owned(),
            nutritional_score: 61.5,
        },
        SearchHit {
            dish_name: "Paneer Tikka".to_owned(),
            nutritional_score: 58.0,
        },
    ])
}

pub(super) fn output_text(buffer: &[u8]) -> String {
    String::from_utf8(buffer.to_vec()).expect("stdout utf-8")
}
