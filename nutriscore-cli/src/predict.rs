//! Predict command implementation for the nutriscore CLI.

use std::io::Write;

use clap::Parser;
use nutriscore_core::{FormFields, PredictionController, ViewState};
use nutriscore_http::HttpPredictionServiceConfig;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::client::{ServiceBuilder, initial_form, service_config};
use crate::render::render_view;
use crate::{
    ARG_BASE_URL, ARG_CALORIES, ARG_CARBS, ARG_PROTEIN, ARG_SUGAR, ARG_TIMEOUT_SECS, CliError,
};

/// CLI arguments for the `predict` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Submit calories, protein, carbohydrates and sugar to the \
                 prediction service and print the score, label and closest \
                 reference dishes. Inputs are sent as typed; empty or \
                 non-numeric values are sent as zero.",
    about = "Predict the nutritional score of one meal"
)]
#[ortho_config(prefix = "NUTRISCORE")]
pub(crate) struct PredictArgs {
    /// Energy in kilocalories.
    #[arg(long = ARG_CALORIES, value_name = "kcal", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) calories: Option<String>,
    /// Protein in grams.
    #[arg(long = ARG_PROTEIN, value_name = "grams", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) protein: Option<String>,
    /// Carbohydrates in grams.
    #[arg(long = ARG_CARBS, value_name = "grams", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) carbs: Option<String>,
    /// Free sugar in grams.
    #[arg(long = ARG_SUGAR, value_name = "grams", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) sugar: Option<String>,
    /// Origin of the prediction service (e.g. "http://127.0.0.1:5000").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Request timeout in seconds; zero or unset waits indefinitely.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl PredictArgs {
    pub(crate) fn into_config(self) -> Result<PredictConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(PredictConfig::from(merged))
    }
}

/// Resolved `predict` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PredictConfig {
    /// Field text submitted to the service.
    pub(crate) form: FormFields,
    /// Connection settings.
    pub(crate) service: HttpPredictionServiceConfig,
}

impl From<PredictArgs> for PredictConfig {
    fn from(args: PredictArgs) -> Self {
        Self {
            form: initial_form(args.calories, args.protein, args.carbs, args.sugar),
            service: service_config(args.base_url, args.timeout_secs),
        }
    }
}

pub(crate) fn run_predict_with(
    args: PredictArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<ViewState, CliError> {
    let config = args.into_config()?;
    execute_predict(config, builder, writer)
}

/// Submit the configured form once and render the settled view.
///
/// A failed request is rendered like any other outcome and then reported as
/// [`CliError::PredictionFailed`].
pub(crate) fn execute_predict(
    config: PredictConfig,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<ViewState, CliError> {
    let service = builder.predictor(&config.service)?;
    let mut controller = PredictionController::new(config.form);
    let values = controller.collect_values();
    controller.submit(service.as_ref(), values);
    render_view(writer, controller.view()).map_err(CliError::WriteOutput)?;

    let view = controller.view().clone();
    match view.error_message() {
        Some(message) => Err(CliError::PredictionFailed {
            message: message.to_owned(),
        }),
        None => Ok(view),
    }
}
