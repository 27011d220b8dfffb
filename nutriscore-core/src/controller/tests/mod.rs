//! Unit tests for the prediction controller.

use super::*;
use crate::test_support::StubPredictionService;
use crate::{IDLE_LABEL, LOADING_FILL};
use rstest::{fixture, rstest};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;


#[fixture]
fn controller() -> PredictionController {
    PredictionController::new(FormFields::new("250", "12", "30", "5"))
}

fn healthy() -> PredictionResult {
    PredictionResult::new(87.5, "Healthy", Vec::new())
}

fn two_matches() -> PredictionResult {
    PredictionResult::new(
        72.0,
        "Very Good",
        vec![
            Match::new("Salad", 9.123, 120.0),
            Match::new("Burger", 3.4, 650.0),
        ],
    )
}

fn rendered(view: &ViewState) -> Vec<&RenderedMatch> {
    view.matches
        .iter()
        .filter_map(|item| match item {
            ListItem::Match(entry) => Some(entry),
            ListItem::Placeholder(_) | ListItem::Error { .. } => None,
        })
        .collect()
}

fn assert_reset(view: &ViewState) {
    assert!(view.form.is_empty(), "inputs should be empty: {:?}", view.form);
    assert_eq!(view.meter, MeterFill::EMPTY);
    assert_eq!(view.score_text, SCORE_PLACEHOLDER);
    assert_eq!(view.label, IDLE_LABEL);
    assert!(view.matches.is_empty());
}

#[rstest]
fn begin_submit_shows_loading_state(mut controller: PredictionController) {
    let values = controller.collect_values();
    let pending = controller.begin_submit(values);

    assert_eq!(pending.values, InputValues::new(250.0, 12.0, 30.0, 5.0));
    assert_eq!(pending.ticket.sequence(), 1);
    let view = controller.view();
    assert_eq!(view.score_text, "...");
    assert_eq!(view.label, "Predicting...");
    assert_eq!(view.meter.percent(), LOADING_FILL);
    assert!(view.is_loading());
}

#[rstest]
fn tickets_increase_with_each_submission(mut controller: PredictionController) {
    let first = controller.begin_submit(InputValues::default()).ticket;
    let second = controller.begin_submit(InputValues::default()).ticket;

    assert!(second > first);
    assert_eq!(controller.awaiting(), Some(second));
}

#[rstest]
fn submit_sends_the_coerced_form_once(mut controller: PredictionController) {
    let service = StubPredictionService::with_result(healthy());
    controller.set_field(Field::Sugar, "lots");
    let values = controller.collect_values();

    let completion = controller.submit(&service, values);

    assert_eq!(completion, Completion::Applied);
    assert_eq!(service.calls(), vec![InputValues::new(250.0, 12.0, 30.0, 0.0)]);
}

#[rstest]
fn successful_prediction_without_matches(mut controller: PredictionController) {
    let service = StubPredictionService::with_result(healthy());
    let values = controller.collect_values();
    let _ = controller.submit(&service, values);

    let view = controller.view();
    assert_eq!(view.score_text, "87.50");
    assert_eq!(view.label, "Healthy");
    assert_eq!(view.meter.to_string(), "88%");
    assert_eq!(
        view.matches,
        vec![ListItem::Placeholder("No matches found".to_owned())]
    );
}

#[rstest]
fn absent_matches_render_the_placeholder(mut controller: PredictionController) {
    controller.render_matches(None);
    assert_eq!(
        controller.view().matches,
        vec![ListItem::Placeholder(NO_MATCHES.to_owned())]
    );
}

#[rstest]
fn matches_render_in_response_order(mut controller: PredictionController) {
    let service = StubPredictionService::with_result(two_matches());
    let values = controller.collect_values();
    let _ = controller.submit(&service, values);

    let entries = rendered(controller.view());
    assert_eq!(entries.len(), 2);
    let titles: Vec<&str> = entries.iter().map(|entry| entry.title.as_str()).collect();
    let scores: Vec<&str> = entries
        .iter()
        .map(|entry| entry.score_text.as_str())
        .collect();
    let calories: Vec<&str> = entries
        .iter()
        .map(|entry| entry.calories_text.as_str())
        .collect();
    let delays: Vec<Duration> = entries.iter().map(|entry| entry.delay).collect();
    assert_eq!(titles, ["Salad", "Burger"]);
    assert_eq!(scores, ["9.12", "3.40"]);
    assert_eq!(calories, ["120", "650"]);
    assert_eq!(delays, [Duration::ZERO, Duration::from_millis(120)]);
}

#[rstest]
#[case::server_body(
    PredictError::Server { status: 400, body: "invalid input".to_owned() },
    "invalid input"
)]
#[case::server_without_body(
    PredictError::Server { status: 500, body: String::new() },
    "Server error"
)]
#[case::transport(
    PredictError::Transport {
        url: "http://127.0.0.1:9/api/predict".to_owned(),
        message: "connection refused".to_owned(),
    },
    "connection refused"
)]
#[case::malformed(
    PredictError::InvalidResponse {
        url: "http://127.0.0.1:5000/api/predict".to_owned(),
        message: "missing field `score`".to_owned(),
    },
    "missing field `score`"
)]
fn failures_show_the_error_entry(
    mut controller: PredictionController,
    #[case] error: PredictError,
    #[case] message: &str,
) {
    let service = StubPredictionService::with_error(error);
    let values = controller.collect_values();
    let _ = controller.submit(&service, values);

    let view = controller.view();
    assert_eq!(view.score_text, "—");
    assert_eq!(view.label, "Error");
    assert_eq!(
        view.matches,
        vec![ListItem::Error {
            title: "Error".to_owned(),
            message: message.to_owned(),
        }]
    );
    assert_eq!(view.error_message(), Some(message));
}

#[rstest]
#[case::idle(None)]
#[case::after_success(Some(Ok(two_matches())))]
#[case::after_failure(Some(Err(PredictError::Server {
    status: 502,
    body: "bad gateway".to_owned(),
})))]
fn reset_is_idempotent(
    mut controller: PredictionController,
    #[case] prior: Option<Result<PredictionResult, PredictError>>,
) {
    if let Some(outcome) = prior {
        let pending = controller.begin_submit(controller.collect_values());
        let _ = controller.complete(pending.ticket, outcome);
    }

    controller.reset();
    assert_reset(controller.view());
    controller.reset();
    assert_reset(controller.view());
}

#[rstest]
fn applied_outcome_is_no_longer_awaited(mut controller: PredictionController) {
    let pending = controller.begin_submit(controller.collect_values());
    assert_eq!(controller.awaiting(), Some(pending.ticket));

    assert_eq!(
        controller.complete(pending.ticket, Ok(healthy())),
        Completion::Applied
    );
    assert_eq!(controller.awaiting(), None);

    let replay = PredictionResult::new(12.0, "Poor", Vec::new());
    assert_eq!(controller.complete(pending.ticket, Ok(replay)), Completion::Stale);
    assert_eq!(controller.view().label, "Healthy");
}

#[rstest]
fn halfway_scores_round_up_in_every_region(mut controller: PredictionController) {
    let service = StubPredictionService::with_result(PredictionResult::new(
        71.125,
        "Good",
        vec![Match::new("Dal Tadka", 12.625, 180.0)],
    ));
    let values = controller.collect_values();
    let _ = controller.submit(&service, values);

    assert_eq!(controller.view().score_text, "71.13");
    let scores: Vec<&str> = rendered(controller.view())
        .iter()
        .map(|entry| entry.score_text.as_str())
        .collect();
    assert_eq!(scores, ["12.63"]);
}

#[rstest]
fn reset_while_loading_clears_the_loading_state(mut controller: PredictionController) {
    let _pending = controller.begin_submit(controller.collect_values());
    controller.reset();
    assert_reset(controller.view());
    assert_eq!(controller.awaiting(), None);
}

#[rstest]
fn discard_policy_keeps_the_latest_submission(mut controller: PredictionController) {
    let first = controller.begin_submit(InputValues::new(900.0, 5.0, 80.0, 40.0));
    let second = controller.begin_submit(InputValues::new(150.0, 20.0, 10.0, 1.0));

    assert_eq!(controller.complete(second.ticket, Ok(healthy())), Completion::Applied);
    assert_eq!(
        controller.complete(first.ticket, Ok(PredictionResult::new(21.0, "Very Poor", vec![]))),
        Completion::Stale
    );
    assert_eq!(controller.view().label, "Healthy");
}

#[rstest]
fn discard_policy_ignores_outcomes_from_before_a_reset(mut controller: PredictionController) {
    let pending = controller.begin_submit(controller.collect_values());
    controller.reset();

    assert_eq!(controller.complete(pending.ticket, Ok(healthy())), Completion::Stale);
    assert_reset(controller.view());
}

#[rstest]
fn apply_policy_lets_the_last_resolution_win() {
    let mut controller =
        PredictionController::with_policy(FormFields::default(), StalePolicy::Apply);
    let first = controller.begin_submit(InputValues::default());
    let second = controller.begin_submit(InputValues::default());

    assert_eq!(controller.complete(second.ticket, Ok(healthy())), Completion::Applied);
    assert_eq!(
        controller.complete(first.ticket, Ok(PredictionResult::new(21.0, "Very Poor", vec![]))),
        Completion::Applied
    );
    assert_eq!(controller.view().label, "Very Poor");
    assert_eq!(controller.view().score_text, "21.00");
}

/// Run two submissions on worker threads, the first slower than the second,
/// applying outcomes in the order they resolve.
fn race_two_submissions(policy: StalePolicy) -> ViewState {
    let slow = Arc::new(
        StubPredictionService::with_result(PredictionResult::new(30.0, "Poor", vec![]))
            .with_latency(Duration::from_millis(250)),
    );
    let fast = Arc::new(StubPredictionService::with_result(healthy()));
    let mut controller = PredictionController::with_policy(FormFields::default(), policy);
    let (tx, rx) = mpsc::channel();

    for service in [slow, fast] {
        let pending = controller.begin_submit(controller.collect_values());
        let sender = tx.clone();
        thread::spawn(move || {
            let outcome = service.predict(&pending.values);
            sender
                .send((pending.ticket, outcome))
                .expect("controller should still be listening");
        });
    }
    drop(tx);

    for (ticket, outcome) in rx {
        let _ = controller.complete(ticket, outcome);
    }
    controller.view().clone()
}

#[rstest]
fn racing_submissions_with_apply_policy_show_the_last_resolved() {
    let view = race_two_submissions(StalePolicy::Apply);
    assert_eq!(view.label, "Poor");
}

#[rstest]
fn racing_submissions_with_discard_policy_show_the_last_issued() {
    let view = race_two_submissions(StalePolicy::Discard);
    assert_eq!(view.label, "Healthy");
}
