//! Contract tests for the wire shapes the console sends and accepts.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use time::macros::date;
use universe_core::{
    ApiConfig, DateRange, FakeBackend, FieldValue, HttpClient, HttpError, HttpMethod,
    HttpRequest, HttpResponse, MeasurementPeriod, MeasurementPeriodSelector, Route,
    SubmitOutcome, Ticker, TickerSelector, UniverseApi, UniverseForm, UniverseId,
    UniverseListView, UniversePayload,
};

/// Transport answering every request with one canned response.
struct CannedClient {
    status: u16,
    body: String,
    seen: Mutex<Vec<HttpRequest>>,
}

impl CannedClient {
    fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_owned(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl HttpClient for CannedClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.seen.lock().expect("lock").push(request);
        let response = HttpResponse::new(self.status, self.body.clone());
        Box::pin(async move { Ok(response) })
    }
}

fn config() -> ApiConfig {
    ApiConfig::new("http://universe.test").expect("valid base url")
}

fn fake_api() -> (Arc<FakeBackend>, UniverseApi) {
    let backend = Arc::new(FakeBackend::new());
    let api = UniverseApi::with_http_client(config(), backend.clone());
    (backend, api)
}

// =============================================================================
// Write payloads
// =============================================================================

#[tokio::test]
async fn create_posts_name_tickers_range_text_and_period() {
    // Given: A payload for Tech5
    let (backend, api) = fake_api();
    let payload = UniversePayload::new(
        "Tech5",
        Ticker::parse_list("AAPL,MSFT").expect("valid tickers"),
        DateRange::parse("2023-01-01", "2023-12-31").expect("valid range"),
        MeasurementPeriod::DEFAULT,
    );

    // When: The universe is created
    let created = api.create_universe(&payload).await.expect("create succeeds");

    // Then: The body carries the literal range text
    let request = &backend.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path(), "/create_universe");
    let body: serde_json::Value =
        serde_json::from_str(request.body.as_deref().expect("body")).expect("json");
    assert_eq!(
        body,
        serde_json::json!({
            "name": "Tech5",
            "tickers": ["AAPL", "MSFT"],
            "date_range": "[2023-01-01, 2023-12-31]",
            "measurement_period": 4
        })
    );
    assert_eq!(created.map(|universe| universe.id), Some(UniverseId::new(1)));
}

#[tokio::test]
async fn create_without_a_record_in_the_response_still_returns_to_the_list() {
    // Given: A backend that acknowledges creates with a bare message
    let client = CannedClient::new(200, r#"{"message": "created"}"#);
    let api = UniverseApi::with_http_client(config(), client.clone());
    let mut form = UniverseForm::create();
    form.set_field(FieldValue::Name(String::from("Tech5")));
    form.set_field(FieldValue::Tickers(
        Ticker::parse_list("AAPL").expect("valid tickers"),
    ));
    form.set_field(FieldValue::BeginDate(Some(date!(2023 - 01 - 01))));
    form.set_field(FieldValue::EndDate(Some(date!(2023 - 12 - 31))));

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The operator is sent to the list
    assert_eq!(outcome, SubmitOutcome::Saved(Route::UniverseList));
    assert_eq!(client.seen.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn delete_sends_all_ids_in_one_body() {
    // Given: A recording transport
    let client = CannedClient::new(200, r#"{"message": "ok"}"#);
    let api = UniverseApi::with_http_client(config(), client.clone());

    // When: Two ids are deleted
    api.delete_universes(&[UniverseId::new(2), UniverseId::new(5)])
        .await
        .expect("delete succeeds");

    // Then: One DELETE carries both
    let seen = client.seen.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, HttpMethod::Delete);
    assert_eq!(seen[0].path(), "/delete_universes");
    assert_eq!(
        seen[0].body.as_deref(),
        Some(r#"{"universe_ids":[2,5]}"#)
    );
}

// =============================================================================
// Read shapes
// =============================================================================

#[tokio::test]
async fn universes_response_without_the_key_reads_as_empty() {
    // Given: A backend answering `{}`
    let client = CannedClient::new(200, "{}");
    let api = UniverseApi::with_http_client(config(), client);

    // When: The collection is fetched
    let universes = api.universes().await.expect("decodes");

    // Then: The list is empty rather than an error
    assert!(universes.is_empty());
}

#[tokio::test]
async fn universes_decode_range_bounds_into_date_ranges() {
    // Given: A stored record with lower/upper bounds
    let client = CannedClient::new(
        200,
        r#"{"universes": [{"id": 3, "name": "Banks", "tickers": ["JPM", "BAC"],
            "date_range": {"lower": "2022-01-01", "upper": "2022-06-30"},
            "measurement_period": 8}]}"#,
    );
    let api = UniverseApi::with_http_client(config(), client);

    // When: The collection is fetched
    let universes = api.universes().await.expect("decodes");

    // Then: The range and period are typed
    assert_eq!(universes.len(), 1);
    assert_eq!(universes[0].date_range.begin(), date!(2022 - 01 - 01));
    assert_eq!(universes[0].date_range.end(), date!(2022 - 06 - 30));
    assert_eq!(universes[0].measurement_period.get(), 8);
}

#[tokio::test]
async fn ticker_options_are_sorted_lexicographically() {
    // Given: A backend listing MSFT before AAPL
    let client = CannedClient::new(
        200,
        r#"{"tickers": [{"ticker": "MSFT", "name": "Microsoft"}, {"ticker": "AAPL", "name": "Apple"}]}"#,
    );
    let api = UniverseApi::with_http_client(config(), client);
    let mut selector = TickerSelector::new();

    // When: Options load
    selector.load(&api).await;

    // Then: They are offered in ascending order
    let options: Vec<&str> = selector.options().iter().map(Ticker::as_str).collect();
    assert_eq!(options, vec!["AAPL", "MSFT"]);
}

#[tokio::test]
async fn stored_symbols_outside_the_input_grammar_are_listed_and_offered() {
    // Given: Records and options holding exchange-suffixed and share-class symbols
    let universes = CannedClient::new(
        200,
        r#"{"universes": [
            {"id": 1, "name": "US", "tickers": ["AAPL"],
             "date_range": {"lower": "2023-01-01", "upper": "2023-12-31"}},
            {"id": 2, "name": "Asia", "tickers": ["1810.HK", "7203.T", "BRK/B"],
             "date_range": {"lower": "2023-01-01", "upper": "2023-12-31"}}]}"#,
    );
    let options = CannedClient::new(
        200,
        r#"{"tickers": [{"ticker": "AAPL"}, {"ticker": "BRK/B"}, {"ticker": "7203.T"}]}"#,
    );
    let mut list = UniverseListView::new();
    let mut selector = TickerSelector::new();

    // When: The list and the ticker options load
    list.load(&UniverseApi::with_http_client(config(), universes)).await;
    selector.load(&UniverseApi::with_http_client(config(), options)).await;

    // Then: Every record is shown and every option can be picked
    assert_eq!(list.page_error(), None);
    assert_eq!(list.rows().len(), 2);
    let asia: Vec<&str> = list.universes()[1].tickers.iter().map(Ticker::as_str).collect();
    assert_eq!(asia, vec!["1810.HK", "7203.T", "BRK/B"]);

    let offered: Vec<&str> = selector.options().iter().map(Ticker::as_str).collect();
    assert_eq!(offered, vec!["7203.T", "AAPL", "BRK/B"]);
    let picked = selector.resolve_list("brk/b 7203.t").expect("listed symbols");
    assert!(selector.select(picked, |_| {}).is_ok());
}

#[tokio::test]
async fn measurement_periods_arrive_as_a_bare_array() {
    // Given: The offline backend
    let (_, api) = fake_api();
    let mut selector = MeasurementPeriodSelector::new();

    // When: Periods load
    selector.load(&api).await;

    // Then: All allowed values are offered
    let periods: Vec<u32> = selector.options().iter().map(|p| p.get()).collect();
    assert_eq!(periods, vec![4, 8, 13, 52]);
}

// =============================================================================
// Query strings
// =============================================================================

#[tokio::test]
async fn short_interest_query_joins_tickers_and_formats_dates() {
    // Given: The offline backend
    let (backend, api) = fake_api();

    // When: Short interest is requested for two tickers
    api.short_interest(
        &Ticker::parse_list("AAPL,MSFT").expect("valid tickers"),
        DateRange::parse("2023-01-01", "2023-03-31").expect("valid range"),
    )
    .await
    .expect("series");

    // Then: The query carries the comma-joined list and ISO dates
    let request = &backend.requests()[0];
    assert_eq!(request.path(), "/get_short_interest");
    assert_eq!(request.query_param("tickers").as_deref(), Some("AAPL,MSFT"));
    assert_eq!(request.query_param("start_date").as_deref(), Some("2023-01-01"));
    assert_eq!(request.query_param("end_date").as_deref(), Some("2023-03-31"));
}

#[tokio::test]
async fn index_symbols_survive_query_encoding() {
    // Given: The offline backend
    let (backend, api) = fake_api();

    // When: Correlation against ^GSPC is requested
    api.correlation(
        &Ticker::parse("AAPL").expect("valid"),
        &Ticker::parse("^GSPC").expect("valid"),
        date!(2024 - 01 - 01),
        date!(2024 - 06 - 30),
    )
    .await
    .expect("report");

    // Then: The caret is decoded back on the server side
    let request = &backend.requests()[0];
    assert_eq!(request.query_param("index").as_deref(), Some("^GSPC"));
}

#[tokio::test]
async fn update_13f_forces_reingestion_of_the_chosen_quarter() {
    // Given: The offline backend
    let (backend, api) = fake_api();

    // When: A quarter is re-ingested
    api.update_13f_data(Some("03-31-2025"), true)
        .await
        .expect("summary");

    // Then: Both flags travel in the query string
    let request = &backend.requests()[0];
    assert_eq!(request.path(), "/update_13F_data");
    assert_eq!(request.query_param("force_update").as_deref(), Some("true"));
    assert_eq!(
        request.query_param("report_quarter").as_deref(),
        Some("03-31-2025")
    );
}
