//! The prediction controller: single owner of the view.
//!
//! Every trigger a front end exposes (form submission, the clear action,
//! the initial load) calls a method here rather than touching the view
//! directly.
//!
//! # Request ordering
//!
//! A submission is split into [`PredictionController::begin_submit`], which
//! shows the loading state and issues a [`RequestTicket`], and
//! [`PredictionController::complete`], which applies the outcome. The network
//! call happens in between, wherever the caller chooses, so other triggers may
//! interleave with an in-flight request.
//!
//! Under [`StalePolicy::Discard`] an outcome is applied only when its ticket
//! is the latest one issued and no reset happened since. Under
//! [`StalePolicy::Apply`] every outcome is applied in resolution order, so
//! the last response to arrive wins regardless of when it was sent.

use log::{debug, error};

use crate::view::{ERROR_LABEL, LOADING_LABEL, LOADING_SCORE, NO_MATCHES, SCORE_PLACEHOLDER};
use crate::{
    Field, FormFields, InputValues, ListItem, MATCH_STAGGER, Match, MeterFill, PredictError,
    PredictionResult, PredictionService, RenderedMatch, StalePolicy, ViewState, format_score,
};

/// Sequence number identifying one submission.
///
/// Tickets are issued in strictly increasing order by a single controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Position of this submission in issue order, starting at one.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// A submission waiting for its outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPrediction {
    /// Ticket to hand back to [`PredictionController::complete`].
    pub ticket: RequestTicket,
    /// Values to send to the service.
    pub values: InputValues,
}

/// Whether an outcome reached the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome was rendered.
    Applied,
    /// A later submission or a reset superseded the outcome; the view is
    /// unchanged.
    Stale,
}

/// Owns the [`ViewState`] and drives request/response cycles.
#[derive(Debug, Clone)]
pub struct PredictionController {
    view: ViewState,
    policy: StalePolicy,
    issued: u64,
    current: Option<RequestTicket>,
}

impl PredictionController {
    /// Create a controller whose inputs hold `form`, discarding stale
    /// outcomes.
    #[must_use]
    pub fn new(form: FormFields) -> Self {
        Self::with_policy(form, StalePolicy::default())
    }

    /// Create a controller with an explicit stale-outcome policy.
    #[must_use]
    pub fn with_policy(form: FormFields, policy: StalePolicy) -> Self {
        Self {
            view: ViewState::idle(form),
            policy,
            issued: 0,
            current: None,
        }
    }

    /// Current view.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Policy applied to outcomes that are no longer the latest.
    #[must_use]
    pub const fn policy(&self) -> StalePolicy {
        self.policy
    }

    /// Ticket whose outcome the view is waiting for, if any.
    ///
    /// Cleared once that outcome is applied or the view is reset.
    #[must_use]
    pub const fn awaiting(&self) -> Option<RequestTicket> {
        self.current
    }

    /// Replace the text of one input field.
    pub fn set_field(&mut self, field: Field, text: impl Into<String>) {
        self.view.form.set(field, text);
    }

    /// Coerce the current input text into values for a submission.
    #[must_use]
    pub fn collect_values(&self) -> InputValues {
        self.view.form.values()
    }

    /// Show the loading state and issue a ticket for `values`.
    pub fn begin_submit(&mut self, values: InputValues) -> PendingPrediction {
        self.issued = self.issued.saturating_add(1);
        let ticket = RequestTicket(self.issued);
        self.current = Some(ticket);
        debug!("submitting prediction #{} with {values:?}", ticket.sequence());
        self.show_loading();
        PendingPrediction { ticket, values }
    }

    /// Apply the outcome of the submission identified by `ticket`.
    ///
    /// Under [`StalePolicy::Discard`] each ticket is applied at most once.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<PredictionResult, PredictError>,
    ) -> Completion {
        if self.policy == StalePolicy::Discard && self.current != Some(ticket) {
            debug!(
                "discarding outcome of prediction #{}; view awaits {:?}",
                ticket.sequence(),
                self.current.map(RequestTicket::sequence)
            );
            return Completion::Stale;
        }
        if self.current == Some(ticket) {
            self.current = None;
        }
        match outcome {
            Ok(result) => self.show_prediction(&result),
            Err(err) => {
                error!("prediction #{} failed: {err:?}", ticket.sequence());
                self.show_error(&err);
            }
        }
        Completion::Applied
    }

    /// Run one full cycle against a synchronous `service`.
    pub fn submit<S>(&mut self, service: &S, values: InputValues) -> Completion
    where
        S: PredictionService + ?Sized,
    {
        let pending = self.begin_submit(values);
        let outcome = service.predict(&pending.values);
        self.complete(pending.ticket, outcome)
    }

    /// Clear the inputs and return every region to its initial state.
    ///
    /// Under [`StalePolicy::Discard`] outcomes of submissions issued before
    /// the reset are ignored when they arrive.
    pub fn reset(&mut self) {
        self.current = None;
        self.view = ViewState::idle(FormFields::default());
    }

    /// Show the in-flight state.
    pub fn show_loading(&mut self) {
        self.view.meter = MeterFill::LOADING;
        LOADING_SCORE.clone_into(&mut self.view.score_text);
        LOADING_LABEL.clone_into(&mut self.view.label);
    }

    /// Show a successful prediction.
    pub fn show_prediction(&mut self, result: &PredictionResult) {
        self.view.meter = MeterFill::from_score(result.score);
        self.view.score_text = format_score(result.score);
        self.view.label.clone_from(&result.category);
        self.render_matches(result.matches.as_deref());
    }

    /// Show a failed prediction with its message in the match list.
    pub fn show_error(&mut self, err: &PredictError) {
        SCORE_PLACEHOLDER.clone_into(&mut self.view.score_text);
        ERROR_LABEL.clone_into(&mut self.view.label);
        self.view.matches = vec![ListItem::Error {
            title: ERROR_LABEL.to_owned(),
            message: err.to_string(),
        }];
    }

    /// Replace the match list with `matches`, preserving their order.
    pub fn render_matches(&mut self, matches: Option<&[Match]>) {
        self.view.matches = match matches {
            Some(entries) if !entries.is_empty() => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| ListItem::Match(render_match(index, entry)))
                .collect(),
            Some(_) | None => vec![ListItem::Placeholder(NO_MATCHES.to_owned())],
        };
    }
}

fn render_match(index: usize, entry: &Match) -> RenderedMatch {
    let position = u32::try_from(index).unwrap_or(u32::MAX);
    RenderedMatch {
        title: entry.dish_name.clone(),
        score_text: format_score(entry.nutritional_score),
        calories_text: entry.calories.to_string(),
        delay: MATCH_STAGGER.saturating_mul(position),
    }
}

#[cfg(test)]
mod tests;
