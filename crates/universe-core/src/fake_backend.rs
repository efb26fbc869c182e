//! In-process stand-in for the universe backend.
//!
//! [`FakeBackend`] implements [`HttpClient`] and answers every endpoint the
//! console calls from an in-memory store. Analytics are synthesized
//! deterministically from the symbol text. Every request is recorded so
//! callers can assert on exactly what went over the wire.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::{json, Value};
use time::{Date, Duration};

use crate::domain::{
    format_date, parse_date, split_list, Holding13F, Ticker, Universe, UniverseId,
    UniversePayload,
};
use crate::http_client::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};

const SEED_TICKERS: [(&str, &str); 7] = [
    ("AAPL", "Apple Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("META", "Meta Platforms Inc."),
    ("MSFT", "Microsoft Corp."),
    ("NVDA", "NVIDIA Corp."),
    ("TSLA", "Tesla Inc."),
];
const SEED_INDEXES: [&str; 2] = ["^IXIC", "^GSPC"];
const MEASUREMENT_PERIODS: [u32; 4] = [4, 8, 13, 52];
const HOLDERS: [&str; 4] = [
    "Vanguard Group Inc",
    "BlackRock Inc",
    "State Street Corp",
    "Fidelity Management & Research",
];
const SHORT_INTEREST_STEP_DAYS: i64 = 14;
const MAX_SHORT_INTEREST_POINTS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Status(u16),
    Transport,
}

#[derive(Debug)]
struct State {
    tickers: BTreeMap<String, String>,
    price_history: BTreeSet<String>,
    universes: BTreeMap<UniverseId, Universe>,
    next_id: u64,
    failures: BTreeMap<String, Failure>,
    requests: Vec<HttpRequest>,
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
    universe_ids: Vec<UniverseId>,
}

#[derive(Debug, Deserialize)]
struct UpdateStockBody {
    symbols: String,
    #[serde(default)]
    index: Option<String>,
    #[serde(default)]
    days: Option<u32>,
}

/// Offline transport answering the full endpoint table.
#[derive(Debug)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    /// Backend seeded with a handful of large-cap tickers and no universes.
    pub fn new() -> Self {
        let tickers: BTreeMap<String, String> = SEED_TICKERS
            .iter()
            .map(|(ticker, name)| ((*ticker).to_owned(), (*name).to_owned()))
            .collect();
        let price_history = tickers
            .keys()
            .cloned()
            .chain(SEED_INDEXES.iter().map(|index| (*index).to_owned()))
            .collect();

        Self {
            state: Mutex::new(State {
                tickers,
                price_history,
                universes: BTreeMap::new(),
                next_id: 1,
                failures: BTreeMap::new(),
                requests: Vec::new(),
            }),
        }
    }

    /// Backend with no tickers, no price history, and no universes.
    pub fn empty() -> Self {
        let backend = Self::new();
        if let Ok(mut state) = backend.state.lock() {
            state.tickers.clear();
            state.price_history.clear();
        }
        backend
    }

    pub fn with_universes(universes: impl IntoIterator<Item = Universe>) -> Self {
        let backend = Self::new();
        for universe in universes {
            backend.insert_universe(universe);
        }
        backend
    }

    /// Store `universe` under its own id, bumping the id sequence past it.
    pub fn insert_universe(&self, universe: Universe) {
        if let Ok(mut state) = self.state.lock() {
            state.next_id = state.next_id.max(universe.id.get() + 1);
            state.universes.insert(universe.id, universe);
        }
    }

    pub fn add_ticker(&self, ticker: &str, name: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.tickers.insert(ticker.to_owned(), name.to_owned());
            state.price_history.insert(ticker.to_owned());
        }
    }

    /// Answer every request to `path` with `status` and a `detail` body.
    pub fn fail_path(&self, path: &str, status: u16) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(path.to_owned(), Failure::Status(status));
        }
    }

    /// Fail every request to `path` before a response is produced.
    pub fn fail_transport(&self, path: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(path.to_owned(), Failure::Transport);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.clear();
        }
    }

    pub fn universes(&self) -> Vec<Universe> {
        self.state
            .lock()
            .map(|state| state.universes.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.requests.len())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, HttpError> {
        self.state
            .lock()
            .map_err(|_| HttpError::Unavailable(String::from("fake backend state is poisoned")))
    }

    fn handle(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut state = self.lock()?;
        state.requests.push(request.clone());

        let path = request.path().to_owned();
        match state.failures.get(&path).copied() {
            Some(Failure::Transport) => return Err(HttpError::Connect(path)),
            Some(Failure::Status(status)) => {
                return Ok(detail(status, format!("injected failure for {path}")))
            }
            None => {}
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let response = match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["tickers"]) => list_tickers(&state),
            (HttpMethod::Get, ["measurement_periods"]) => {
                HttpResponse::ok_json(json!(MEASUREMENT_PERIODS).to_string())
            }
            (HttpMethod::Get, ["get_universes"]) => {
                let universes: Vec<&Universe> = state.universes.values().collect();
                HttpResponse::ok_json(json!({ "universes": universes }).to_string())
            }
            (HttpMethod::Post, ["create_universe"]) => create_universe(&mut state, &request),
            (HttpMethod::Put, ["edit_universe", id]) => edit_universe(&mut state, id, &request),
            (HttpMethod::Delete, ["delete_universes"]) => delete_universes(&mut state, &request),
            (HttpMethod::Get, ["get_short_interest"]) => short_interest(&request),
            (HttpMethod::Get, ["stock_volatility"]) => volatility(&state, &request),
            (HttpMethod::Get, ["stock_correlation"]) => correlation(&state, &request),
            (HttpMethod::Post, ["update_stock_data"]) => update_stock_data(&mut state, &request),
            (HttpMethod::Get, ["holdings", ticker]) => holdings(ticker, &request),
            (HttpMethod::Get, ["update_13F_data"]) => update_13f_data(&request),
            _ => detail(404, "Not Found"),
        };

        Ok(response)
    }
}

impl HttpClient for FakeBackend {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self.handle(request);
        Box::pin(async move { response })
    }
}

fn detail(status: u16, message: impl Into<String>) -> HttpResponse {
    HttpResponse::new(status, json!({ "detail": message.into() }).to_string())
}

fn list_tickers(state: &State) -> HttpResponse {
    let tickers: Vec<Value> = state
        .tickers
        .iter()
        .map(|(ticker, name)| json!({ "ticker": ticker, "name": name }))
        .collect();
    HttpResponse::ok_json(json!({ "tickers": tickers }).to_string())
}

fn decode_body<T: serde::de::DeserializeOwned>(request: &HttpRequest) -> Result<T, HttpResponse> {
    let body = request.body.as_deref().unwrap_or_default();
    serde_json::from_str(body).map_err(|error| detail(422, format!("invalid body: {error}")))
}

fn create_universe(state: &mut State, request: &HttpRequest) -> HttpResponse {
    let payload: UniversePayload = match decode_body(request) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let id = UniverseId::new(state.next_id);
    match payload.into_universe(id) {
        Ok(universe) => {
            state.next_id += 1;
            let body = json!({ "universe": &universe }).to_string();
            state.universes.insert(id, universe);
            HttpResponse::ok_json(body)
        }
        Err(error) => detail(422, error.to_string()),
    }
}

fn edit_universe(state: &mut State, raw_id: &str, request: &HttpRequest) -> HttpResponse {
    let Ok(id) = raw_id.parse::<u64>().map(UniverseId::new) else {
        return detail(422, format!("invalid universe id '{raw_id}'"));
    };
    if !state.universes.contains_key(&id) {
        return detail(404, "Universe not found");
    }

    let payload: UniversePayload = match decode_body(request) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match payload.into_universe(id) {
        Ok(universe) => {
            let body = json!({ "universe": &universe }).to_string();
            state.universes.insert(id, universe);
            HttpResponse::ok_json(body)
        }
        Err(error) => detail(422, error.to_string()),
    }
}

fn delete_universes(state: &mut State, request: &HttpRequest) -> HttpResponse {
    let body: DeleteBody = match decode_body(request) {
        Ok(body) => body,
        Err(response) => return response,
    };

    if let Some(missing) = body
        .universe_ids
        .iter()
        .find(|id| !state.universes.contains_key(id))
    {
        return detail(404, format!("Universe {missing} not found"));
    }

    for id in &body.universe_ids {
        state.universes.remove(id);
    }
    HttpResponse::ok_json(
        json!({ "message": format!("Deleted {} universes", body.universe_ids.len()) })
            .to_string(),
    )
}

fn date_param(request: &HttpRequest, name: &str) -> Result<Date, HttpResponse> {
    let raw = request
        .query_param(name)
        .ok_or_else(|| detail(422, format!("missing query parameter '{name}'")))?;
    parse_date(&raw).map_err(|error| detail(422, error.to_string()))
}

fn date_window(request: &HttpRequest) -> Result<(Date, Date), HttpResponse> {
    let start = date_param(request, "start_date")?;
    let end = date_param(request, "end_date")?;
    if start > end {
        return Err(detail(422, "start_date must not be after end_date"));
    }
    Ok((start, end))
}

fn short_interest(request: &HttpRequest) -> HttpResponse {
    let (start, end) = match date_window(request) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let raw = request.query_param("tickers").unwrap_or_default();
    let parsed: Result<Vec<Ticker>, _> = split_list(&raw).map(Ticker::from_backend).collect();
    let tickers = match parsed {
        Ok(tickers) => tickers,
        Err(error) => return detail(422, error.to_string()),
    };

    let mut series = BTreeMap::new();
    for ticker in &tickers {
        let seed = symbol_seed(ticker.as_str());
        let mut points = Vec::new();
        let mut date = start;
        let mut step = 0_u64;
        while date <= end && points.len() < MAX_SHORT_INTEREST_POINTS {
            let value = 1.0 + ((seed + step * 7) % 90) as f64 / 10.0;
            points.push(json!({ "date": format_date(date), "short_interest": value }));
            step += 1;
            date += Duration::days(SHORT_INTEREST_STEP_DAYS);
        }
        series.insert(ticker.to_string(), points);
    }

    HttpResponse::ok_json(json!({ "short_interest": series }).to_string())
}

fn trading_days(start: Date, end: Date) -> u32 {
    let calendar = (end - start).whole_days().max(0) + 1;
    ((calendar * 5) / 7).max(1) as u32
}

fn volatility(state: &State, request: &HttpRequest) -> HttpResponse {
    let (start, end) = match date_window(request) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let symbol = request.query_param("symbol").unwrap_or_default();
    if !state.price_history.contains(&symbol) {
        return detail(404, format!("No data found for {symbol}"));
    }

    let seed = symbol_seed(&symbol);
    let daily = 0.008 + (seed % 120) as f64 / 10_000.0;
    let mean = ((seed % 21) as f64 - 10.0) / 10_000.0;
    HttpResponse::ok_json(
        json!({
            "stock_symbol": symbol,
            "start_date": format_date(start),
            "end_date": format_date(end),
            "daily_volatility": daily,
            "mean_daily_return": mean,
            "min_daily_return": mean - daily * 3.0,
            "max_daily_return": mean + daily * 3.0,
            "trading_days": trading_days(start, end),
        })
        .to_string(),
    )
}

fn correlation(state: &State, request: &HttpRequest) -> HttpResponse {
    let (start, end) = match date_window(request) {
        Ok(window) => window,
        Err(response) => return response,
    };
    let symbol = request.query_param("symbol").unwrap_or_default();
    let index = request.query_param("index").unwrap_or_default();
    for required in [&symbol, &index] {
        if !state.price_history.contains(required) {
            return detail(404, format!("No data found for {required}"));
        }
    }

    let seed = symbol_seed(&symbol) ^ symbol_seed(&index);
    let correlation = 0.2 + (seed % 75) as f64 / 100.0;
    HttpResponse::ok_json(
        json!({
            "stock_symbol": symbol,
            "index": index,
            "start_date": format_date(start),
            "end_date": format_date(end),
            "correlation": correlation,
            "beta": 0.6 + (seed % 90) as f64 / 100.0,
            "trading_days": trading_days(start, end),
        })
        .to_string(),
    )
}

fn update_stock_data(state: &mut State, request: &HttpRequest) -> HttpResponse {
    let body: UpdateStockBody = match decode_body(request) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let symbols = match Ticker::parse_list(&body.symbols) {
        Ok(symbols) if !symbols.is_empty() => symbols,
        Ok(_) => return detail(422, "no symbols provided"),
        Err(error) => return detail(422, error.to_string()),
    };

    for symbol in &symbols {
        state.price_history.insert(symbol.to_string());
        if !symbol.as_str().starts_with('^') {
            state
                .tickers
                .entry(symbol.to_string())
                .or_insert_with(|| symbol.to_string());
        }
    }
    if let Some(index) = body.index.filter(|index| !index.is_empty()) {
        state.price_history.insert(index);
    }

    HttpResponse::ok_json(
        json!({
            "message": format!(
                "Updated {} symbols over the last {} days",
                symbols.len(),
                body.days.unwrap_or(60)
            )
        })
        .to_string(),
    )
}

fn holdings(raw_ticker: &str, request: &HttpRequest) -> HttpResponse {
    let decoded = urlencoding::decode(raw_ticker)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| raw_ticker.to_owned());
    let ticker = match Ticker::from_backend(&decoded) {
        Ok(ticker) => ticker,
        Err(error) => return detail(422, error.to_string()),
    };
    let quarter = request
        .query_param("quarter")
        .unwrap_or_else(|| String::from("12-31-2024"));

    let seed = symbol_seed(ticker.as_str());
    let holdings: Vec<Holding13F> = HOLDERS
        .iter()
        .enumerate()
        .map(|(rank, holder)| Holding13F {
            holder_name: (*holder).to_owned(),
            shares: (seed % 1_000_000 + 1_000_000) * (HOLDERS.len() - rank) as u64,
            filing_date: quarter.clone(),
            quarter: quarter.clone(),
        })
        .collect();

    HttpResponse::ok_json(json!({ "holdings": holdings }).to_string())
}

fn update_13f_data(request: &HttpRequest) -> HttpResponse {
    HttpResponse::ok_json(
        json!({
            "status": "success",
            "report_quarter": request.query_param("report_quarter"),
            "force_update": request.query_param("force_update").as_deref() == Some("true"),
        })
        .to_string(),
    )
}

fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(11_u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64))
}
