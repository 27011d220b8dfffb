//! Search command implementation for the nutriscore CLI.

use std::io::Write;

use clap::Parser;
use nutriscore_core::SearchHit;
use nutriscore_http::HttpPredictionServiceConfig;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::client::{ServiceBuilder, service_config};
use crate::render::render_search;
use crate::{
    ARG_BASE_URL, ARG_JSON, ARG_SEARCH_QUERY, ARG_TIMEOUT_SECS, CliError, ENV_SEARCH_QUERY,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Look up reference dishes whose name contains the query \
                 and print each with its nutritional score, in the order \
                 the service returns them.",
    about = "Find reference dishes by name"
)]
#[ortho_config(prefix = "NUTRISCORE")]
pub(crate) struct SearchArgs {
    /// Text to look for in dish names.
    #[arg(value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Origin of the prediction service (e.g. "http://127.0.0.1:5000").
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Request timeout in seconds; zero or unset waits indefinitely.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Print the hits as a JSON array instead of text lines.
    #[arg(long = ARG_JSON)]
    #[serde(default)]
    pub(crate) json: bool,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    /// Query sent to the service.
    pub(crate) query: String,
    /// Connection settings.
    pub(crate) service: HttpPredictionServiceConfig,
    /// Whether to print JSON.
    pub(crate) json: bool,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_QUERY,
            env: ENV_SEARCH_QUERY,
        })?;
        Ok(Self {
            query,
            service: service_config(args.base_url, args.timeout_secs),
            json: args.json,
        })
    }
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<Vec<SearchHit>, CliError> {
    let config = args.into_config()?;
    execute_search(config, builder, writer)
}

pub(crate) fn execute_search(
    config: SearchConfig,
    builder: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<Vec<SearchHit>, CliError> {
    let catalog = builder.catalog(&config.service)?;
    let hits = catalog
        .search(&config.query)
        .map_err(|source| CliError::Search {
            query: config.query.clone(),
            source,
        })?;
    if config.json {
        write_json(writer, &hits)?;
    } else {
        render_search(writer, &hits).map_err(CliError::WriteOutput)?;
    }
    Ok(hits)
}

fn write_json(writer: &mut dyn Write, hits: &[SearchHit]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(hits).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
