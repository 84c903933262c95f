// Application configuration, loaded from environment variables and CLI flags.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::query::{LeagueTables, TableLayout};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Spreadsheet id for the Google Sheets backend.
    pub sheet_id: Option<String>,
    /// Bearer token for the Google Sheets backend. Obtaining it is the
    /// deployment's job.
    pub access_token: Option<String>,
    /// Run against in-memory sheets instead of Google Sheets.
    pub local_mode: bool,
    /// JSON file seeding the in-memory sheets in local mode.
    pub sheets_file: Option<PathBuf>,
    /// Public URL of this service; when set it is pinged periodically.
    pub web_url: Option<String>,
    pub keepalive_interval: Duration,
    pub command_prefix: String,
    /// Probability in [0, 1] that the pre-check gate turns a command away.
    pub rejection_rate: f64,
    pub allow_sheet_writes: bool,
    pub sheets_timeout: Duration,
    pub tables: LeagueTables,
}

impl Config {
    /// Load configuration from the process environment and CLI arguments.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 10000)
    /// - `SHEET_ID`, `GOOGLE_ACCESS_TOKEN` - Google Sheets backend
    /// - `SHEET_RELAY_LOCAL_MODE` - `true` to use in-memory sheets
    /// - `SHEETS_FILE` - JSON file with in-memory sheets
    /// - `WEB_URL` - URL to self-ping; `KEEPALIVE_INTERVAL_SECS` (default: 240)
    /// - `COMMAND_PREFIX` (default: `!`)
    /// - `REJECTION_RATE` (default: 0)
    /// - `ALLOW_SHEET_WRITES` (default: false)
    /// - `SHEETS_TIMEOUT_SECS` (default: 10)
    /// - `{STANDINGS,PLAYERS,FIXTURES}_SHEET`, `_HEADER_ROW` (1-based), `_ROWS`
    ///
    /// CLI flags:
    /// - `--local` - Enable local mode
    /// - `--port <PORT>` - Override the port
    /// - `--sheets-file <PATH>` - Override `SHEETS_FILE`
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(&args, &env)
    }

    /// Build the configuration from explicit argument and variable sets.
    pub fn from_sources(args: &[String], env: &HashMap<String, String>) -> Self {
        let var = |name: &str| env.get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| var("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(10000);

        let local_mode = args.iter().any(|a| a == "--local")
            || var("SHEET_RELAY_LOCAL_MODE").is_some_and(|v| is_truthy(&v));

        let sheets_file = Self::parse_cli_value(args, "--sheets-file")
            .or_else(|| var("SHEETS_FILE"))
            .map(PathBuf::from);

        let keepalive_secs = var("KEEPALIVE_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|s: &u64| *s > 0)
            .unwrap_or(240);

        let rejection_rate = var("REJECTION_RATE")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let timeout_secs = var("SHEETS_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|s: &u64| *s > 0)
            .unwrap_or(10);

        let defaults = LeagueTables::default();
        let tables = LeagueTables {
            standings: table_layout(&var, "STANDINGS", defaults.standings),
            players: table_layout(&var, "PLAYERS", defaults.players),
            fixtures: table_layout(&var, "FIXTURES", defaults.fixtures),
        };

        Config {
            port,
            sheet_id: var("SHEET_ID"),
            access_token: var("GOOGLE_ACCESS_TOKEN"),
            local_mode,
            sheets_file,
            web_url: var("WEB_URL"),
            keepalive_interval: Duration::from_secs(keepalive_secs),
            command_prefix: var("COMMAND_PREFIX").unwrap_or_else(|| "!".to_string()),
            rejection_rate,
            allow_sheet_writes: var("ALLOW_SHEET_WRITES").is_some_and(|v| is_truthy(&v)),
            sheets_timeout: Duration::from_secs(timeout_secs),
            tables,
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

/// Apply `<PREFIX>_SHEET`, `<PREFIX>_HEADER_ROW` and `<PREFIX>_ROWS` over a default layout.
fn table_layout(
    var: &impl Fn(&str) -> Option<String>,
    prefix: &str,
    default: TableLayout,
) -> TableLayout {
    let mut layout = match var(&format!("{prefix}_SHEET")) {
        Some(sheet) => TableLayout {
            sheet,
            ..default
        },
        None => default,
    };
    if let Some(row) = var(&format!("{prefix}_HEADER_ROW")).and_then(|v| v.parse::<usize>().ok()) {
        if row > 0 {
            layout = layout.header_at_sheet_row(row);
        }
    }
    if let Some(rows) = var(&format!("{prefix}_ROWS")).and_then(|v| v.parse::<usize>().ok()) {
        layout = layout.with_max_rows(rows);
    }
    layout
}
