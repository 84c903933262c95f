// Command dispatcher: chat message -> gate -> query -> rendered reply.

pub mod command;
pub mod gate;
pub mod render;

use std::time::Instant;

use thiserror::Error;

use crate::error::QueryError;
use crate::metrics;
use crate::query::{
    Grid, LeagueTables, MatchRecord, PlayerRecord, RankingPolicy, Roster, StandingsRecord,
};
use crate::sheets::{CellRef, CellRefError, SpreadsheetClient};

pub use command::Command;
pub use gate::RejectionGate;

/// Why a recognized command produced an error reply.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    InvalidCell(#[from] CellRefError),

    #[error("sheet writes are disabled")]
    WritesDisabled,

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CommandError {
    /// Label for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            CommandError::Usage(_) | CommandError::InvalidCell(_) => "usage",
            CommandError::WritesDisabled => "forbidden",
            CommandError::Query(e) => e.category().as_str(),
        }
    }
}

/// Runs league queries against a spreadsheet backend.
///
/// Owns the backend handle; every query fetches fresh grids.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    client: C,
    tables: LeagueTables,
    prefix: String,
    gate: RejectionGate,
    allow_writes: bool,
}

impl<C: SpreadsheetClient> Dispatcher<C> {
    pub fn new(client: C, tables: LeagueTables) -> Self {
        Self {
            client,
            tables,
            prefix: "!".to_string(),
            gate: RejectionGate::disabled(),
            allow_writes: false,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_gate(mut self, gate: RejectionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_writes(mut self, allow: bool) -> Self {
        self.allow_writes = allow;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn tables(&self) -> &LeagueTables {
        &self.tables
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handle one chat message. `None` means the message is not for us.
    pub async fn handle(&self, content: &str) -> Option<String> {
        let (name, parsed) = Command::parse_named(&self.prefix, content)?;

        if !self.gate.admit() {
            metrics::COMMANDS_REJECTED_TOTAL.inc();
            tracing::debug!(command = name, "command rejected by gate");
            return Some(render::REJECTED.to_string());
        }

        tracing::debug!(command = name, "dispatching command");
        let result = match parsed {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e),
        };
        let reply = match result {
            Ok(text) => {
                metrics::COMMANDS_TOTAL.with_label_values(&[name, "ok"]).inc();
                text
            }
            Err(e) => {
                metrics::COMMANDS_TOTAL
                    .with_label_values(&[name, e.outcome()])
                    .inc();
                render::error(&self.prefix, &e)
            }
        };
        Some(reply)
    }

    /// Run a parsed command and render its reply.
    pub async fn execute(&self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::Ping => Ok("Pong!".to_string()),
            Command::Help => Ok(render::help(&self.prefix)),
            Command::Standings { limit } => Ok(render::standings(&self.standings(limit).await?)),
            Command::Leaderboard { policy, limit } => {
                let players = self.leaderboard(policy, limit).await?;
                Ok(render::leaderboard(policy, &players))
            }
            Command::Player { name } => Ok(render::player(&self.player(&name).await?)),
            Command::Team { name } => Ok(render::roster(&self.roster(&name).await?)),
            Command::Fixture { a, b, games } => {
                Ok(render::fixtures(&self.fixtures(&a, &b, games).await?))
            }
            Command::SetCell { table, cell, value } => {
                self.set_cell(&table, cell, &value).await?;
                Ok(format!("Updated {table}!{cell}."))
            }
        }
    }

    pub async fn standings(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<StandingsRecord>, QueryError> {
        let grid = self.fetch(&self.tables.standings.sheet).await?;
        self.tables.standings(&grid, limit)
    }

    pub async fn leaderboard(
        &self,
        policy: RankingPolicy,
        limit: usize,
    ) -> Result<Vec<PlayerRecord>, QueryError> {
        let grid = self.fetch(&self.tables.players.sheet).await?;
        self.tables.leaderboard(&grid, policy, Some(limit))
    }

    pub async fn player(&self, name: &str) -> Result<PlayerRecord, QueryError> {
        let grid = self.fetch(&self.tables.players.sheet).await?;
        self.tables.player(&grid, name)
    }

    pub async fn roster(&self, team: &str) -> Result<Roster, QueryError> {
        let (players, standings) = tokio::try_join!(
            self.fetch(&self.tables.players.sheet),
            self.fetch(&self.tables.standings.sheet)
        )?;
        self.tables.roster(&players, &standings, team)
    }

    pub async fn fixtures(
        &self,
        a: &str,
        b: &str,
        games: usize,
    ) -> Result<Vec<MatchRecord>, QueryError> {
        let grid = self.fetch(&self.tables.fixtures.sheet).await?;
        self.tables.fixtures(&grid, a, b, games)
    }

    /// Single-cell overwrite, refused unless writes are enabled.
    pub async fn set_cell(
        &self,
        table: &str,
        cell: CellRef,
        value: &str,
    ) -> Result<(), CommandError> {
        if !self.allow_writes {
            return Err(CommandError::WritesDisabled);
        }
        match self.client.write_cell(table, cell, value).await {
            Ok(()) => {
                metrics::SHEET_WRITES_TOTAL.with_label_values(&["ok"]).inc();
                tracing::info!(table, %cell, "cell updated");
                Ok(())
            }
            Err(e) => {
                metrics::SHEET_WRITES_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!(table, %cell, "cell update failed: {e}");
                Err(QueryError::from(e).into())
            }
        }
    }

    async fn fetch(&self, sheet: &str) -> Result<Grid, QueryError> {
        let started = Instant::now();
        let result = self.client.fetch_grid(sheet).await;
        metrics::SHEET_FETCH_DURATION_SECONDS
            .with_label_values(&[sheet])
            .observe(started.elapsed().as_secs_f64());

        match result {
            Ok(grid) => {
                metrics::SHEET_FETCHES_TOTAL
                    .with_label_values(&[sheet, "ok"])
                    .inc();
                Ok(grid)
            }
            Err(e) => {
                metrics::SHEET_FETCHES_TOTAL
                    .with_label_values(&[sheet, "error"])
                    .inc();
                tracing::warn!(sheet, "worksheet fetch failed: {e}");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::MemorySheets;

    fn league() -> MemorySheets {
        let sheets = MemorySheets::new();
        sheets.insert(
            "Standings",
            Grid::from_rows([
                vec!["Team", "GP", "W", "D", "L", "GF", "GA", "GD", "PTS"],
                vec!["Tigers", "3", "1", "1", "1", "4", "4", "0", "4"],
                vec!["Lions", "3", "2", "1", "0", "5", "2", "3", "7"],
            ]),
        );
        sheets.insert(
            "Players",
            Grid::from_rows([
                vec!["Player", "Team", "GP", "Goals", "Assists"],
                vec!["A", "Lions", "10", "5", "1"],
                vec!["B", "Lions", "7", "5", "2"],
            ]),
        );
        sheets
    }

    #[tokio::test]
    async fn test_ping() {
        let dispatcher = Dispatcher::new(league(), LeagueTables::default());
        assert_eq!(dispatcher.handle("!ping").await.as_deref(), Some("Pong!"));
    }

    #[tokio::test]
    async fn test_non_command_gets_no_reply() {
        let dispatcher = Dispatcher::new(league(), LeagueTables::default());
        assert_eq!(dispatcher.handle("good game everyone").await, None);
    }

    #[tokio::test]
    async fn test_gate_runs_before_query() {
        let dispatcher =
            Dispatcher::new(league(), LeagueTables::default()).with_gate(RejectionGate::new(1.0));
        assert_eq!(
            dispatcher.handle("!standings").await.as_deref(),
            Some(render::REJECTED)
        );
    }

    #[tokio::test]
    async fn test_missing_worksheet_is_transport_error() {
        let dispatcher = Dispatcher::new(league(), LeagueTables::default());
        let err = dispatcher.fixtures("Lions", "Tigers", 1).await.unwrap_err();
        assert!(matches!(err, QueryError::Transport(_)));
    }

    #[tokio::test]
    async fn test_writes_disabled_by_default() {
        let dispatcher = Dispatcher::new(league(), LeagueTables::default());
        let err = dispatcher
            .set_cell("Standings", CellRef::new(1, 8), "9")
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::WritesDisabled));
    }

    #[tokio::test]
    async fn test_set_cell_updates_sheet() {
        let sheets = league();
        let dispatcher =
            Dispatcher::new(sheets.clone(), LeagueTables::default()).with_writes(true);
        let reply = dispatcher.handle("!setcell Standings I2 10").await.unwrap();
        assert_eq!(reply, "Updated Standings!I2.");
        assert_eq!(sheets.grid("Standings").unwrap().cell(1, 8), "10");

        let table = dispatcher.standings(None).await.unwrap();
        assert_eq!(table[0].team, "Tigers");
    }

    #[tokio::test]
    async fn test_usage_errors_counted_under_command_name() {
        let dispatcher = Dispatcher::new(league(), LeagueTables::default());
        let series = metrics::COMMANDS_TOTAL.with_label_values(&["series", "usage"]);
        let before = series.get();

        let reply = dispatcher.handle("!series Lions vs Tigers").await.unwrap();
        assert!(reply.starts_with("Usage: `!series"));
        assert!(series.get() > before);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(CommandError::Usage("x").outcome(), "usage");
        assert_eq!(CommandError::WritesDisabled.outcome(), "forbidden");
        let err: CommandError = QueryError::EmptyGroup {
            group: "Eagles".into(),
        }
        .into();
        assert_eq!(err.outcome(), "empty_group");
    }
}
