//! Command-line front end for the nutriscore prediction service.
//!
//! Three subcommands share one controller:
//!
//! - `predict` submits the four inputs once and prints the resulting view.
//! - `search` looks up reference dishes by name.
//! - `session` reads commands from standard input, dispatching each
//!   submission on its own thread so responses may arrive out of order.
#![forbid(unsafe_code)]

use std::io::{self, BufReader, Write};

use clap::{Parser, Subcommand};

mod client;
mod error;
mod predict;
mod render;
mod search;
mod session;

pub use error::CliError;

use client::HttpServiceBuilder;
use predict::{PredictArgs, run_predict_with};
use search::{SearchArgs, run_search_with};
use session::{SessionArgs, run_session_with};

pub(crate) const ARG_CALORIES: &str = "calories";
pub(crate) const ARG_PROTEIN: &str = "protein";
pub(crate) const ARG_CARBS: &str = "carbs";
pub(crate) const ARG_SUGAR: &str = "sugar";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_JSON: &str = "json";
pub(crate) const ARG_STALE_RESPONSES: &str = "stale-responses";
pub(crate) const ARG_SEARCH_QUERY: &str = "query";
pub(crate) const ENV_SEARCH_QUERY: &str = "NUTRISCORE_CMDS_SEARCH_QUERY";

/// Run the nutriscore CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when a
/// request fails, or when output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let builder = HttpServiceBuilder;
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Predict(args) => run_predict_with(args, &builder, &mut stdout).map(drop),
        Command::Search(args) => run_search_with(args, &builder, &mut stdout).map(drop),
        Command::Session(args) => {
            let input = BufReader::new(io::stdin());
            run_session_with(args, &builder, input, &mut stdout).map(drop)
        }
    }?;
    stdout.flush().map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "nutriscore",
    about = "Query a nutritional score prediction service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict the score of one meal and print the result.
    Predict(PredictArgs),
    /// Find reference dishes by name.
    Search(SearchArgs),
    /// Edit inputs and submit predictions interactively.
    Session(SessionArgs),
}
