//! Behavior-driven tests for how failures surface: form validation,
//! rejected writes, broken transports and late responses.

use std::sync::Arc;

use universe_core::{
    parse_date, ApiConfig, ApiErrorKind, Completion, DateRange, DeleteOutcome, FakeBackend,
    FieldValue, FormValidationError, Loadable, MeasurementPeriod, SubmitOutcome, Ticker,
    TickerSelector, Universe, UniverseApi, UniverseDetailView, UniverseForm, UniverseId,
    UniverseListView, UniversePayload,
};

fn api_for(backend: &Arc<FakeBackend>) -> UniverseApi {
    let config = ApiConfig::new("http://universe.test").expect("valid base url");
    UniverseApi::with_http_client(config, backend.clone())
}

fn universe(id: u64, name: &str) -> Universe {
    Universe::new(
        UniverseId::new(id),
        name,
        Ticker::parse_list("AAPL").expect("valid tickers"),
        DateRange::parse("2023-01-01", "2023-12-31").expect("valid range"),
        MeasurementPeriod::DEFAULT,
    )
    .expect("valid universe")
}

fn complete_form() -> UniverseForm {
    let mut form = UniverseForm::create();
    form.set_field(FieldValue::Name(String::from("Tech5")));
    form.set_field(FieldValue::Tickers(
        Ticker::parse_list("AAPL,MSFT").expect("valid tickers"),
    ));
    form.set_field(FieldValue::BeginDate(Some(
        parse_date("2023-01-01").expect("valid date"),
    )));
    form.set_field(FieldValue::EndDate(Some(
        parse_date("2023-12-31").expect("valid date"),
    )));
    form
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn when_no_tickers_are_chosen_submit_is_rejected_without_a_request() {
    // Given: A form with only a name
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = UniverseForm::create();
    form.set_field(FieldValue::Name(String::from("Tech5")));

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The draft stays local and the error is shown
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(FormValidationError::TickersRequired)
    );
    assert_eq!(form.error(), Some("At least one stock must be selected."));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn when_the_name_is_only_whitespace_submit_is_rejected_without_a_request() {
    // Given: A complete form whose name is blank
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = complete_form();
    form.set_field(FieldValue::Name(String::from("   ")));

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The name rule fires first and nothing is sent
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(FormValidationError::NameRequired)
    );
    assert_eq!(form.error(), Some("Universe name is required."));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn when_a_date_is_missing_submit_is_rejected_without_a_request() {
    // Given: A complete form whose end date was cleared
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = complete_form();
    form.set_field(FieldValue::EndDate(None));

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: Both dates are asked for and nothing is sent
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(FormValidationError::DatesRequired)
    );
    assert_eq!(form.error(), Some("Both begin and end dates are required."));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn when_dates_are_reversed_submit_is_rejected() {
    // Given: A complete form whose end precedes its begin
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = complete_form();
    form.set_field(FieldValue::EndDate(Some(
        parse_date("2022-12-31").expect("valid date"),
    )));

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The ordering rule blocks the write
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(FormValidationError::DatesOutOfOrder)
    );
    assert_eq!(form.error(), Some("Start date must be earlier than end date."));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn when_a_field_changes_after_a_rejection_the_error_clears_on_resubmit() {
    // Given: A form that was rejected for a missing name
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = complete_form();
    form.set_field(FieldValue::Name(String::new()));
    assert!(matches!(form.submit(&api).await, SubmitOutcome::Rejected(_)));

    // When: The name is filled in and the form resubmitted
    form.set_field(FieldValue::Name(String::from("Tech5")));
    let outcome = form.submit(&api).await;

    // Then: The write goes through and no error remains
    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert_eq!(form.error(), None);
    assert_eq!(backend.universes().len(), 1);
}

// =============================================================================
// Rejected writes
// =============================================================================

#[tokio::test]
async fn when_the_backend_rejects_a_create_the_form_shows_why() {
    // Given: A backend failing creates with 500
    let backend = Arc::new(FakeBackend::new());
    backend.fail_path("/create_universe", 500);
    let api = api_for(&backend);
    let mut form = complete_form();

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The failure is reported and the draft is kept
    let SubmitOutcome::Failed(error) = outcome else {
        panic!("expected a failed write");
    };
    assert_eq!(error.status_code(), Some(500));
    assert!(error.retryable());
    assert_eq!(
        form.error(),
        Some("Failed to save universe: injected failure for /create_universe")
    );
    assert_eq!(form.state().name, "Tech5");
    assert!(backend.universes().is_empty());

    // And: A manual resubmit after recovery saves exactly once
    backend.clear_failures();
    assert_eq!(
        form.submit(&api).await,
        SubmitOutcome::Saved(universe_core::Route::UniverseList)
    );
    assert_eq!(form.error(), None);
    assert_eq!(backend.universes().len(), 1);
}

#[tokio::test]
async fn when_an_edited_universe_was_removed_the_backend_detail_is_shown() {
    // Given: An edit form for a record the backend no longer holds
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = UniverseForm::edit(&universe(42, "Gone"));

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The 404 detail reaches the operator
    let SubmitOutcome::Failed(error) = outcome else {
        panic!("expected a failed write");
    };
    assert!(error.is_not_found());
    assert_eq!(form.error(), Some("Failed to save universe: Universe not found"));
}

#[tokio::test]
async fn when_a_delete_fails_nothing_is_removed_locally() {
    // Given: A loaded list with one row selected and a failing delete endpoint
    let backend = Arc::new(FakeBackend::with_universes([universe(1, "A"), universe(2, "B")]));
    let api = api_for(&backend);
    let mut list = UniverseListView::new();
    list.load(&api).await;
    list.toggle_selected(UniverseId::new(2));
    backend.fail_path("/delete_universes", 503);

    // When: Delete is pressed
    let outcome = list.delete_selected(&api).await;

    // Then: The rows and selection survive and the page error explains
    assert!(matches!(outcome, DeleteOutcome::Failed(_)));
    assert_eq!(list.ids().len(), 2);
    assert!(list.is_selected(UniverseId::new(2)));
    assert_eq!(
        list.page_error(),
        Some("Failed to delete universes: injected failure for /delete_universes")
    );
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn when_the_backend_is_unreachable_the_list_reports_a_load_failure() {
    // Given: A transport that cannot reach /get_universes
    let backend = Arc::new(FakeBackend::new());
    backend.fail_transport("/get_universes");
    let api = api_for(&backend);

    // When: The list loads
    let mut list = UniverseListView::new();
    list.load(&api).await;

    // Then: The slot is failed, the page error carries the cause, and the
    // empty-collection row is not shown in place of the failure
    assert!(matches!(list.state(), Loadable::Failed(_)));
    let message = list.page_error().expect("page error");
    assert!(message.starts_with("Failed to load universes: GET /get_universes failed"));
    assert!(list.rows().is_empty());
}

#[tokio::test]
async fn when_ticker_options_fail_selection_is_not_restricted() {
    // Given: A failing ticker endpoint
    let backend = Arc::new(FakeBackend::new());
    backend.fail_path("/tickers", 500);
    let api = api_for(&backend);
    let mut selector = TickerSelector::new();
    selector.load(&api).await;

    // When: A ticker is selected anyway
    let mut chosen = Vec::new();
    let result = selector.select(
        Ticker::parse_list("ZZZZ").expect("valid ticker"),
        |tickers| chosen = tickers,
    );

    // Then: The selection is accepted and the failure stays visible
    assert!(result.is_ok());
    assert_eq!(chosen.len(), 1);
    assert!(selector.state().error().is_some());
}

#[tokio::test]
async fn api_errors_classify_transport_and_status_failures() {
    // Given: One transport failure and one status failure
    let backend = Arc::new(FakeBackend::new());
    backend.fail_transport("/tickers");
    backend.fail_path("/measurement_periods", 404);
    let api = api_for(&backend);

    // When: Both endpoints are called
    let transport = api.tickers().await.expect_err("transport failure");
    let status = api.measurement_periods().await.expect_err("status failure");

    // Then: Each error carries its kind and stable code
    assert_eq!(transport.kind(), ApiErrorKind::Transport);
    assert_eq!(transport.code(), "api.transport");
    assert_eq!(status.kind(), ApiErrorKind::Status);
    assert!(status.is_not_found());
    assert!(!status.retryable());
}

// =============================================================================
// Late responses
// =============================================================================

#[test]
fn when_an_older_response_arrives_last_it_is_discarded() {
    // Given: Two overlapping option loads
    let mut selector = TickerSelector::new();
    let first = selector.begin_load();
    let second = selector.begin_load();

    // When: The newer load finishes before the older one
    let newer = selector.finish(
        second,
        Ok::<_, String>(Ticker::parse_list("MSFT").expect("valid")),
    );
    let older = selector.finish(
        first,
        Ok::<_, String>(Ticker::parse_list("AAPL").expect("valid")),
    );

    // Then: Only the newer result is kept
    assert_eq!(newer, Completion::Applied);
    assert_eq!(older, Completion::Discarded);
    assert_eq!(selector.options()[0].as_str(), "MSFT");
}

#[tokio::test]
async fn when_the_list_is_reloaded_the_earlier_response_is_discarded() {
    // Given: A list load whose response is held back while a newer load runs
    let backend = Arc::new(FakeBackend::with_universes([universe(1, "A")]));
    let api = api_for(&backend);
    let mut list = UniverseListView::new();
    let first = list.begin_load();
    let early = api.universes().await;

    api.create_universe(&UniversePayload::new(
        "B",
        Ticker::parse_list("MSFT").expect("valid"),
        DateRange::parse("2023-01-01", "2023-12-31").expect("valid range"),
        MeasurementPeriod::DEFAULT,
    ))
    .await
    .expect("create succeeds");
    let second = list.begin_load();
    let late = api.universes().await;

    // When: The newer response lands before the older one
    let newer = list.finish_load(second, late);
    let older = list.finish_load(first, early);

    // Then: The view shows the newer collection only
    assert_eq!(newer, Completion::Applied);
    assert_eq!(older, Completion::Discarded);
    assert_eq!(list.ids().len(), 2);
}

#[tokio::test]
async fn when_the_detail_page_closes_the_chart_response_is_dropped() {
    // Given: A chart load in flight
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut detail = UniverseDetailView::new(Some(universe(1, "A")));
    let request = detail.begin_chart().expect("record has tickers");
    let result = api.short_interest(&request.tickers, request.range).await;

    // When: The page is left before the response is applied
    detail.cancel();
    let completion = detail.finish_chart(request.token, result);

    // Then: No chart is shown
    assert_eq!(completion, Completion::Discarded);
    assert_eq!(detail.chart(), None);
}

#[test]
fn when_a_view_closes_pending_results_are_dropped() {
    // Given: A load in flight
    let mut selector = TickerSelector::new();
    let token = selector.begin_load();

    // When: The view is torn down before the response arrives
    selector.cancel();
    let completion = selector.finish(
        token,
        Ok::<_, String>(Ticker::parse_list("AAPL").expect("valid")),
    );

    // Then: Nothing is applied
    assert_eq!(completion, Completion::Discarded);
    assert!(selector.options().is_empty());
}
