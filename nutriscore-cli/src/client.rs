//! Construction of service clients and of the initial form.

use std::sync::Arc;
use std::time::Duration;

use nutriscore_core::{DishCatalog, Field, FormFields, PredictionService};
use nutriscore_http::{HttpPredictionService, HttpPredictionServiceConfig};

use crate::CliError;

/// Prediction service shared between the session and its worker threads.
pub(crate) type SharedPredictionService = Arc<dyn PredictionService + Send + Sync>;

/// Builds the services a command talks to.
pub(crate) trait ServiceBuilder {
    fn predictor(
        &self,
        config: &HttpPredictionServiceConfig,
    ) -> Result<SharedPredictionService, CliError>;

    fn catalog(&self, config: &HttpPredictionServiceConfig)
    -> Result<Box<dyn DishCatalog>, CliError>;
}

/// Builds HTTP clients for the configured service.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HttpServiceBuilder;

impl HttpServiceBuilder {
    fn build(config: &HttpPredictionServiceConfig) -> Result<HttpPredictionService, CliError> {
        HttpPredictionService::with_config(config.clone()).map_err(|source| {
            CliError::BuildService {
                base_url: config.base_url.clone(),
                source,
            }
        })
    }
}

impl ServiceBuilder for HttpServiceBuilder {
    fn predictor(
        &self,
        config: &HttpPredictionServiceConfig,
    ) -> Result<SharedPredictionService, CliError> {
        Ok(Arc::new(Self::build(config)?))
    }

    fn catalog(
        &self,
        config: &HttpPredictionServiceConfig,
    ) -> Result<Box<dyn DishCatalog>, CliError> {
        Ok(Box::new(Self::build(config)?))
    }
}

/// Resolve the service configuration from the shared connection options.
pub(crate) fn service_config(
    base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> HttpPredictionServiceConfig {
    let mut config = base_url.map_or_else(
        HttpPredictionServiceConfig::default,
        HttpPredictionServiceConfig::new,
    );
    // Zero means no limit.
    if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

/// Form holding the given field texts; absent fields stay empty.
pub(crate) fn initial_form(
    calories: Option<String>,
    protein: Option<String>,
    carbs: Option<String>,
    sugar: Option<String>,
) -> FormFields {
    let mut form = FormFields::default();
    for (field, text) in Field::ALL.into_iter().zip([calories, protein, carbs, sugar]) {
        if let Some(text) = text {
            form.set(field, text);
        }
    }
    form
}
