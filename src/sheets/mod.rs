// Spreadsheet backends: the data source behind every query.

pub mod cell_ref;
pub mod google;
pub mod memory;

use std::future::Future;

use thiserror::Error;

use crate::config::Config;
use crate::error::TransportError;
use crate::query::Grid;

pub use cell_ref::{CellRef, CellRefError};
pub use google::GoogleSheetsClient;
pub use memory::{LoadError, MemorySheets};

/// Source of table grids and sink for single-cell writes.
///
/// Authentication and session handling belong to the implementation.
pub trait SpreadsheetClient: Send + Sync {
    /// All cell values of the named worksheet, as text.
    fn fetch_grid(&self, table: &str)
        -> impl Future<Output = Result<Grid, TransportError>> + Send;

    /// Overwrite one cell. No locking and no retry.
    fn write_cell(
        &self,
        table: &str,
        cell: CellRef,
        value: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// The backends the service can run against.
#[derive(Debug, Clone)]
pub enum SheetBackend {
    Google(GoogleSheetsClient),
    Memory(MemorySheets),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("missing setting {0}")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SheetBackend {
    /// Pick the backend the configuration asks for.
    ///
    /// Local mode starts from `sheets_file` when one is given, or empty.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        if config.local_mode {
            let sheets = match &config.sheets_file {
                Some(path) => MemorySheets::from_json_file(path)?,
                None => MemorySheets::new(),
            };
            return Ok(SheetBackend::Memory(sheets));
        }

        let sheet_id = config
            .sheet_id
            .as_deref()
            .ok_or(BackendError::MissingSetting("SHEET_ID"))?;
        let token = config
            .access_token
            .as_deref()
            .ok_or(BackendError::MissingSetting("GOOGLE_ACCESS_TOKEN"))?;
        let client = GoogleSheetsClient::new(sheet_id, token, config.sheets_timeout)?;
        Ok(SheetBackend::Google(client))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SheetBackend::Google(_) => "google",
            SheetBackend::Memory(_) => "memory",
        }
    }
}

impl SpreadsheetClient for SheetBackend {
    async fn fetch_grid(&self, table: &str) -> Result<Grid, TransportError> {
        match self {
            SheetBackend::Google(client) => client.fetch_grid(table).await,
            SheetBackend::Memory(sheets) => sheets.fetch_grid(table).await,
        }
    }

    async fn write_cell(
        &self,
        table: &str,
        cell: CellRef,
        value: &str,
    ) -> Result<(), TransportError> {
        match self {
            SheetBackend::Google(client) => client.write_cell(table, cell, value).await,
            SheetBackend::Memory(sheets) => sheets.write_cell(table, cell, value).await,
        }
    }
}
