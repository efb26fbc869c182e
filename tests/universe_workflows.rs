//! Behavior-driven tests for the universe management journeys: create,
//! list, sort, open, edit and batch delete against the offline backend.

use std::sync::Arc;

use universe_core::{
    parse_date, ApiConfig, DateRange, DeleteOutcome, FakeBackend, FieldValue, HttpMethod,
    ListRow, MeasurementPeriod, NavigationShell, Route, SubmitOutcome, Ticker, Universe,
    UniverseApi, UniverseDetailView, UniverseForm, UniverseId, UniverseListView,
};

fn api_for(backend: &Arc<FakeBackend>) -> UniverseApi {
    let config = ApiConfig::new("http://universe.test").expect("valid base url");
    UniverseApi::with_http_client(config, backend.clone())
}

fn universe(id: u64, name: &str, tickers: &str) -> Universe {
    Universe::new(
        UniverseId::new(id),
        name,
        Ticker::parse_list(tickers).expect("valid tickers"),
        DateRange::parse("2023-01-01", "2023-12-31").expect("valid range"),
        MeasurementPeriod::DEFAULT,
    )
    .expect("valid universe")
}

fn fill_tech5(form: &mut UniverseForm) {
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
}

// =============================================================================
// Create, list, open, edit
// =============================================================================

#[tokio::test]
async fn when_operator_creates_a_universe_it_appears_in_the_list_and_detail() {
    // Given: An empty backend and a filled create form
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut form = UniverseForm::create();
    fill_tech5(&mut form);

    // When: The form is submitted
    let outcome = form.submit(&api).await;

    // Then: The operator lands on the list, which shows the new record
    assert_eq!(outcome, SubmitOutcome::Saved(Route::UniverseList));
    let mut list = UniverseListView::new();
    list.load(&api).await;
    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    match &rows[0] {
        ListRow::Universe {
            name,
            tickers,
            date_range,
            measurement_period,
            ..
        } => {
            assert_eq!(name, "Tech5");
            assert_eq!(tickers, "AAPL,MSFT");
            assert_eq!(date_range, "2023-01-01 - 2023-12-31");
            assert_eq!(*measurement_period, 4);
        }
        other => panic!("expected a universe row, got {other:?}"),
    }

    // And: Opening the row forwards the record to the detail page
    let id = list.ids()[0];
    let route = list.open(id).expect("row opens");
    assert_eq!(route.path(), "/universes/Tech5");
    let detail = UniverseDetailView::from_route(&route);
    let lines = detail.summary().lines();
    assert!(lines.contains(&String::from("name: Tech5")));
    assert!(lines.contains(&String::from("tickers: AAPL, MSFT")));
    assert!(lines.contains(&String::from("Date range: 2023-01-01 - 2023-12-31")));
}

#[tokio::test]
async fn when_operator_edits_a_universe_the_detail_page_shows_the_update() {
    // Given: A backend holding one universe
    let backend = Arc::new(FakeBackend::with_universes([universe(7, "Tech5", "AAPL,MSFT")]));
    let api = api_for(&backend);
    let mut list = UniverseListView::new();
    list.load(&api).await;
    let record = list.universes()[0].clone();

    // When: The edit form renames it and adds a ticker
    let mut form = UniverseForm::edit(&record);
    form.set_field(FieldValue::Name(String::from("Tech6")));
    form.set_field(FieldValue::Tickers(
        Ticker::parse_list("AAPL,MSFT,NVDA").expect("valid tickers"),
    ));
    let outcome = form.submit(&api).await;

    // Then: The operator lands on the updated detail page
    let SubmitOutcome::Saved(route) = outcome else {
        panic!("edit should succeed");
    };
    let updated = route.universe().expect("detail carries the record");
    assert_eq!(updated.id, UniverseId::new(7));
    assert_eq!(updated.name, "Tech6");
    assert_eq!(updated.tickers.len(), 3);
    assert_eq!(backend.universes()[0].name, "Tech6");

    // And: Exactly one PUT went to the record's edit path
    let puts: Vec<_> = backend
        .requests()
        .into_iter()
        .filter(|request| request.method == HttpMethod::Put)
        .collect();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path(), "/edit_universe/7");
}

// =============================================================================
// Sorting and deletion
// =============================================================================

#[tokio::test]
async fn when_sort_header_is_clicked_twice_original_order_returns() {
    // Given: A list loaded with three universes
    let backend = Arc::new(FakeBackend::with_universes([
        universe(3, "C", "AAPL"),
        universe(1, "A", "AAPL"),
        universe(2, "B", "AAPL"),
    ]));
    let api = api_for(&backend);
    let mut list = UniverseListView::new();
    list.load(&api).await;
    let ascending = list.ids();

    // When: The header is clicked once, then again
    list.toggle_sort();
    let descending = list.ids();
    list.toggle_sort();

    // Then: The order flips and then returns without another fetch
    assert_eq!(ascending, vec![1, 2, 3].into_iter().map(UniverseId::new).collect::<Vec<_>>());
    assert_eq!(descending, vec![3, 2, 1].into_iter().map(UniverseId::new).collect::<Vec<_>>());
    assert_eq!(list.ids(), ascending);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn when_two_rows_are_deleted_one_request_removes_both() {
    // Given: Five saved universes with ids 2 and 5 selected
    let backend = Arc::new(FakeBackend::with_universes(
        (1..=5).map(|id| universe(id, &format!("U{id}"), "AAPL")),
    ));
    let api = api_for(&backend);
    let mut list = UniverseListView::new();
    list.load(&api).await;
    list.toggle_selected(UniverseId::new(2));
    list.toggle_selected(UniverseId::new(5));

    // When: Delete is pressed
    let outcome = list.delete_selected(&api).await;

    // Then: A single DELETE carried both ids and the rest remain
    assert_eq!(
        outcome,
        DeleteOutcome::Deleted(vec![UniverseId::new(2), UniverseId::new(5)])
    );
    let deletes: Vec<_> = backend
        .requests()
        .into_iter()
        .filter(|request| request.method == HttpMethod::Delete)
        .collect();
    assert_eq!(deletes.len(), 1);
    let body: serde_json::Value =
        serde_json::from_str(deletes[0].body.as_deref().expect("body")).expect("json body");
    assert_eq!(body["universe_ids"], serde_json::json!([2, 5]));

    let remaining = vec![1, 3, 4].into_iter().map(UniverseId::new).collect::<Vec<_>>();
    assert_eq!(list.ids(), remaining);
    assert!(list.selected().is_empty());
    let stored: Vec<UniverseId> = backend.universes().iter().map(|u| u.id).collect();
    assert_eq!(stored, remaining);
}

#[tokio::test]
async fn when_nothing_is_selected_delete_sends_nothing() {
    // Given: A loaded list with no selection
    let backend = Arc::new(FakeBackend::with_universes([universe(1, "A", "AAPL")]));
    let api = api_for(&backend);
    let mut list = UniverseListView::new();
    list.load(&api).await;

    // When: Delete is pressed
    let outcome = list.delete_selected(&api).await;

    // Then: No request leaves the console
    assert_eq!(outcome, DeleteOutcome::NothingSelected);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn when_no_universes_exist_the_list_shows_the_empty_row() {
    // Given: An empty backend
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);

    // When: The list loads
    let mut list = UniverseListView::new();
    list.load(&api).await;

    // Then: One placeholder row is rendered
    assert_eq!(
        list.rows(),
        vec![ListRow::Empty {
            message: "No universes available"
        }]
    );
}

// =============================================================================
// Detail chart and navigation
// =============================================================================

#[tokio::test]
async fn when_detail_page_opens_the_chart_covers_every_ticker() {
    // Given: A forwarded record with two tickers
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut detail = UniverseDetailView::new(Some(universe(1, "Tech5", "AAPL,MSFT")));

    // When: The chart loads
    detail.load_chart(&api).await;

    // Then: One series per ticker, rows sorted by date
    let chart = detail.chart().expect("chart loaded");
    assert_eq!(chart.series, vec!["AAPL", "MSFT"]);
    assert!(!chart.rows.is_empty());
    assert!(chart.rows.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(chart.rows[0].date, "2023-01-01");
}

#[tokio::test]
async fn when_detail_page_opens_without_a_record_nothing_is_fetched() {
    // Given: A detail page reached without forwarded state
    let backend = Arc::new(FakeBackend::new());
    let api = api_for(&backend);
    let mut detail = UniverseDetailView::new(None);

    // When: The chart is requested
    let outcome = detail.load_chart(&api).await;

    // Then: Fields fall back to N/A and no request is sent
    assert_eq!(outcome, None);
    assert!(detail.summary().lines().iter().all(|line| line.ends_with("N/A")));
    assert_eq!(backend.request_count(), 0);
}

#[test]
fn when_root_path_is_opened_the_list_is_shown() {
    // Given: A shell showing another page
    let mut shell = NavigationShell::new();
    shell.select_menu(universe_core::MenuItem::StockAnalysis);

    // When: The root path is opened
    let opened = shell.open_path("/");

    // Then: The universe list is the current route and highlighted
    assert!(opened);
    assert_eq!(shell.current(), &Route::UniverseList);
    assert_eq!(shell.menu()[0], ("Universes", true));
}
