//! Interactive session: an event loop over standard input and worker threads.
//!
//! The loop is the only owner of the controller. A reader thread turns input
//! lines into events; every submission spawns a worker thread that calls the
//! service and sends the outcome back on the same channel. Commands keep
//! flowing while requests are in flight, so a `clear` or a second `submit`
//! can overtake an earlier response.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use clap::Parser;
use log::{debug, warn};
use nutriscore_core::{
    Completion, Field, FormFields, PredictError, PredictionController, PredictionResult, RequestTicket,
    StalePolicy, UnknownFieldError, ViewState,
};
use nutriscore_http::HttpPredictionServiceConfig;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::{ServiceBuilder, SharedPredictionService, initial_form, service_config};
use crate::render::render_view;
use crate::{
    ARG_BASE_URL, ARG_CALORIES, ARG_CARBS, ARG_PROTEIN, ARG_STALE_RESPONSES, ARG_SUGAR,
    ARG_TIMEOUT_SECS, CliError,
};

/// CLI arguments for the `session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Start with the given inputs, submit them, then read \
                 commands from standard input: `set <field> <text>`, \
                 `submit`, four values separated by whitespace, `clear`, \
                 `show` and `quit`. Pending requests finish before the \
                 session exits.",
    about = "Edit inputs and submit predictions interactively"
)]
#[ortho_config(prefix = "NUTRISCORE")]
pub(crate) struct SessionArgs {
    /// Initial energy in kilocalories.
    #[arg(long = ARG_CALORIES, value_name = "kcal", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) calories: Option<String>,
    /// Initial protein in grams.
    #[arg(long = ARG_PROTEIN, value_name = "grams", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) protein: Option<String>,
    /// Initial carbohydrates in grams.
    #[arg(long = ARG_CARBS, value_name = "grams", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) carbs: Option<String>,
    /// Initial free sugar in grams.
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
    /// What to do with responses overtaken by a later submission or a clear:
    /// `discard` (default) or `apply`.
    #[arg(long = ARG_STALE_RESPONSES, value_name = "policy")]
    #[serde(default)]
    pub(crate) stale_responses: Option<String>,
}

impl SessionArgs {
    pub(crate) fn into_config(self) -> Result<SessionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SessionConfig::try_from(merged)
    }
}

/// Resolved `session` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionConfig {
    /// Field text submitted when the session starts.
    pub(crate) form: FormFields,
    /// Connection settings.
    pub(crate) service: HttpPredictionServiceConfig,
    /// Handling of overtaken responses.
    pub(crate) policy: StalePolicy,
}

impl TryFrom<SessionArgs> for SessionConfig {
    type Error = CliError;

    fn try_from(args: SessionArgs) -> Result<Self, Self::Error> {
        let policy = args
            .stale_responses
            .as_deref()
            .map(StalePolicy::from_str)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            form: initial_form(args.calories, args.protein, args.carbs, args.sugar),
            service: service_config(args.base_url, args.timeout_secs),
            policy,
        })
    }
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    /// Replace the text of one field.
    Set { field: Field, text: String },
    /// Submit the current fields.
    Submit,
    /// Replace all four fields and submit.
    SubmitValues(FormFields),
    /// Reset the view.
    Clear,
    /// Print the current view.
    Show,
    /// Stop reading input.
    Quit,
}

/// Rejected session input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SessionCommandError {
    #[error("unknown command {command:?}; expected set, submit, clear, show, quit or four values")]
    Unknown { command: String },
    #[error("usage: set <field> <text>")]
    SetUsage,
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),
}

impl FromStr for SessionCommand {
    type Err = SessionCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["submit"] => Ok(Self::Submit),
            ["clear"] => Ok(Self::Clear),
            ["show"] => Ok(Self::Show),
            ["quit" | "exit"] => Ok(Self::Quit),
            ["set", field, rest @ ..] => {
                let field = field.parse::<Field>()?;
                Ok(Self::Set {
                    field,
                    text: rest.join(" "),
                })
            }
            ["set"] => Err(SessionCommandError::SetUsage),
            [calories, protein, carbs, sugar] => Ok(Self::SubmitValues(FormFields::new(
                *calories, *protein, *carbs, *sugar,
            ))),
            _ => Err(SessionCommandError::Unknown {
                command: line.trim().to_owned(),
            }),
        }
    }
}

#[derive(Debug)]
enum SessionEvent {
    Line(String),
    InputClosed,
    Resolved {
        ticket: RequestTicket,
        outcome: Result<PredictionResult, PredictError>,
    },
}

pub(crate) fn run_session_with<R>(
    args: SessionArgs,
    builder: &dyn ServiceBuilder,
    input: R,
    writer: &mut dyn Write,
) -> Result<ViewState, CliError>
where
    R: BufRead + Send + 'static,
{
    let config = args.into_config()?;
    execute_session(config, builder, input, writer)
}

/// Run the session until input ends and every dispatched request resolved.
///
/// Returns the final view, which is also printed.
pub(crate) fn execute_session<R>(
    config: SessionConfig,
    builder: &dyn ServiceBuilder,
    input: R,
    writer: &mut dyn Write,
) -> Result<ViewState, CliError>
where
    R: BufRead + Send + 'static,
{
    let service = builder.predictor(&config.service)?;
    let (events, inbox) = mpsc::channel();
    spawn_reader(input, events.clone());

    let mut session = Session {
        controller: PredictionController::with_policy(config.form, config.policy),
        service,
        events,
        in_flight: 0,
        input_open: true,
        writer,
    };
    session.dispatch()?;
    session.run(&inbox)?;
    session.finish()
}

struct Session<'w> {
    controller: PredictionController,
    service: SharedPredictionService,
    events: Sender<SessionEvent>,
    in_flight: usize,
    input_open: bool,
    writer: &'w mut dyn Write,
}

impl Session<'_> {
    fn run(&mut self, inbox: &Receiver<SessionEvent>) -> Result<(), CliError> {
        while self.input_open || self.in_flight > 0 {
            // The session holds a sender, so the channel never disconnects.
            let Ok(event) = inbox.recv() else {
                break;
            };
            match event {
                SessionEvent::Line(line) if self.input_open => self.handle_line(&line)?,
                SessionEvent::Line(_) => {}
                SessionEvent::InputClosed => self.input_open = false,
                SessionEvent::Resolved { ticket, outcome } => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if self.controller.complete(ticket, outcome) == Completion::Applied {
                        self.render()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<(), CliError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        match line.parse::<SessionCommand>() {
            Ok(SessionCommand::Set { field, text }) => self.controller.set_field(field, text),
            Ok(SessionCommand::Submit) => self.dispatch()?,
            Ok(SessionCommand::SubmitValues(form)) => {
                for field in Field::ALL {
                    self.controller.set_field(field, form.get(field));
                }
                self.dispatch()?;
            }
            Ok(SessionCommand::Clear) => {
                self.controller.reset();
                self.render()?;
            }
            Ok(SessionCommand::Show) => self.render()?,
            Ok(SessionCommand::Quit) => {
                debug!("session quit with {} request(s) in flight", self.in_flight);
                self.input_open = false;
            }
            Err(err) => writeln!(self.writer, "error: {err}").map_err(CliError::WriteOutput)?,
        }
        Ok(())
    }

    /// Submit the current fields on a worker thread.
    fn dispatch(&mut self) -> Result<(), CliError> {
        let values = self.controller.collect_values();
        let pending = self.controller.begin_submit(values);
        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        thread::spawn(move || {
            let outcome = service.predict(&pending.values);
            // The loop has already returned when nobody is listening.
            let _ = events.send(SessionEvent::Resolved {
                ticket: pending.ticket,
                outcome,
            });
        });
        self.in_flight += 1;
        self.render()
    }

    fn render(&mut self) -> Result<(), CliError> {
        render_view(self.writer, self.controller.view()).map_err(CliError::WriteOutput)
    }

    fn finish(mut self) -> Result<ViewState, CliError> {
        writeln!(self.writer, "final:").map_err(CliError::WriteOutput)?;
        self.render()?;
        Ok(self.controller.view().clone())
    }
}

fn spawn_reader<R>(input: R, events: Sender<SessionEvent>)
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(text) => {
                    if events.send(SessionEvent::Line(text)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!("stopped reading session input: {err}");
                    break;
                }
            }
        }
        let _ = events.send(SessionEvent::InputClosed);
    });
}
