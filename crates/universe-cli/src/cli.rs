//! CLI argument definitions for the universe admin console.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tickers` | List selectable tickers |
//! | `periods` | List allowed measurement periods |
//! | `list` | Show saved universes sorted by id |
//! | `show` | Show one universe, optionally with its short-interest chart |
//! | `create` | Create a universe |
//! | `edit` | Edit a universe |
//! | `delete` | Delete one or more universes in one request |
//! | `short-interest` | Short-interest series for tickers |
//! | `volatility` | Daily volatility for a stock |
//! | `correlation` | Correlation and beta against an index |
//! | `update-stocks` | Refresh backend price history |
//! | `holdings` | 13F institutional holders for a ticker |
//! | `update-13f` | Re-ingest 13F filings |
//! | `menu` | Render the navigation menu |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--api-url` | `$UNIVERSE_API_URL` or `http://localhost:8000` | Backend origin |
//! | `--timeout-ms` | `$UNIVERSE_API_TIMEOUT_MS` or `3000` | Per-request timeout |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Use the in-process fake backend |
//!
//! # Examples
//!
//! ```bash
//! universe list --desc --format table
//! universe create --name Tech5 --tickers AAPL,MSFT --begin 2023-01-01 --end 2023-12-31
//! universe delete 2 5
//! universe correlation AAPL --index ^GSPC --mock --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Universe admin console.
///
/// Manage saved ticker universes and inspect the analytics served by the
/// universe backend.
#[derive(Debug, Parser)]
#[command(
    name = "universe",
    author,
    version,
    about = "Universe admin console",
    long_about = "Create, edit, list and delete saved stock universes, and inspect \
short interest, volatility, correlation and 13F holdings served by the universe backend.\n\
\n\
Use 'universe <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Backend origin, e.g. http://localhost:8000.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Run against the in-process fake backend instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tickers available for selection.
    Tickers,

    /// List allowed measurement periods.
    Periods,

    /// Show saved universes sorted by id.
    ///
    /// # Examples
    ///
    ///   universe list
    ///   universe list --desc --format table
    List(ListArgs),

    /// Show one universe.
    Show(ShowArgs),

    /// Create a universe.
    ///
    /// # Examples
    ///
    ///   universe create --name Tech5 --tickers AAPL,MSFT --begin 2023-01-01 --end 2023-12-31
    Create(UniverseFields),

    /// Edit an existing universe. Omitted fields keep their saved value.
    Edit(EditArgs),

    /// Delete universes by id in a single request.
    Delete(DeleteArgs),

    /// Short-interest series for one or more tickers.
    ShortInterest(ShortInterestArgs),

    /// Daily-return volatility for a stock.
    Volatility(VolatilityArgs),

    /// Correlation and beta of a stock against an index.
    Correlation(CorrelationArgs),

    /// Ask the backend to refresh price history.
    UpdateStocks(UpdateStocksArgs),

    /// 13F institutional holders of a ticker.
    Holdings(HoldingsArgs),

    /// Ask the backend to re-ingest 13F filings.
    #[command(name = "update-13f")]
    Update13f(Update13fArgs),

    /// Render the navigation menu, optionally after opening a path.
    Menu(MenuArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Sort by id descending (one header click).
    #[arg(long, default_value_t = false)]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Universe id.
    pub id: u64,

    /// Also load the short-interest chart.
    #[arg(long, default_value_t = false)]
    pub chart: bool,
}

/// Draft fields shared by `create` and `edit`.
#[derive(Debug, Args)]
pub struct UniverseFields {
    /// Universe name.
    #[arg(long)]
    pub name: Option<String>,

    /// Comma-separated tickers.
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// First day of the range (YYYY-MM-DD).
    #[arg(long)]
    pub begin: Option<String>,

    /// Last day of the range (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,

    /// Measurement period; must be one the backend allows.
    #[arg(long)]
    pub period: Option<i64>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Universe id.
    pub id: u64,

    #[command(flatten)]
    pub fields: UniverseFields,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Universe ids to delete.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<u64>,
}

#[derive(Debug, Args)]
pub struct ShortInterestArgs {
    /// Tickers to chart.
    #[arg(required = true, num_args = 1.., value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub begin: String,

    /// Last day (YYYY-MM-DD).
    #[arg(long)]
    pub end: String,
}

/// Date window for the analysis commands. Defaults to the last year.
#[derive(Debug, Args)]
pub struct DateWindow {
    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Last day (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Debug, Args)]
pub struct VolatilityArgs {
    /// Stock symbol.
    pub symbol: String,

    #[command(flatten)]
    pub window: DateWindow,
}

#[derive(Debug, Args)]
pub struct CorrelationArgs {
    /// Stock symbol.
    pub symbol: String,

    /// Benchmark index.
    #[arg(long, default_value = "^IXIC")]
    pub index: String,

    #[command(flatten)]
    pub window: DateWindow,
}

#[derive(Debug, Args)]
pub struct UpdateStocksArgs {
    /// Symbols to refresh, comma or space separated.
    pub symbols: String,

    /// Benchmark index refreshed alongside.
    #[arg(long, default_value = "^IXIC")]
    pub index: String,

    /// Days of history to fetch.
    #[arg(long, default_value_t = 60)]
    pub days: u32,

    /// Refresh only the index.
    #[arg(long, default_value_t = false)]
    pub index_only: bool,
}

#[derive(Debug, Args)]
pub struct HoldingsArgs {
    /// Ticker to look up.
    pub ticker: String,

    /// Quarter end (MM-DD-YYYY); one of the last four.
    #[arg(long)]
    pub quarter: Option<String>,
}

#[derive(Debug, Args)]
pub struct Update13fArgs {
    /// Quarter end (MM-DD-YYYY); one of the last four.
    #[arg(long)]
    pub quarter: Option<String>,
}

#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Path to open first, e.g. /stock_analysis.
    pub path: Option<String>,
}
