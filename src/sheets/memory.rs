// In-memory spreadsheet used in local mode and tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::error::TransportError;
use crate::query::Grid;

use super::{CellRef, SpreadsheetClient};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read sheets file: {0}")]
    Io(#[from] std::io::Error),

    #[error("sheets file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Thread-safe map of worksheet name to grid.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    inner: Arc<RwLock<HashMap<String, Grid>>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load worksheets from a JSON object of `{"Sheet": [["a", "b"], ...]}`.
    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let sheets: HashMap<String, Grid> = serde_json::from_str(text)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(sheets)),
        })
    }

    pub fn insert(&self, table: &str, grid: Grid) {
        let mut sheets = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        sheets.insert(table.to_string(), grid);
    }

    /// Snapshot of one worksheet.
    pub fn grid(&self, table: &str) -> Option<Grid> {
        let sheets = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        sheets.get(table).cloned()
    }

    pub fn table_names(&self) -> Vec<String> {
        let sheets = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = sheets.keys().cloned().collect();
        names.sort();
        names
    }
}

impl SpreadsheetClient for MemorySheets {
    async fn fetch_grid(&self, table: &str) -> Result<Grid, TransportError> {
        self.grid(table)
            .ok_or_else(|| TransportError::UnknownTable(table.to_string()))
    }

    async fn write_cell(
        &self,
        table: &str,
        cell: CellRef,
        value: &str,
    ) -> Result<(), TransportError> {
        let mut sheets = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let grid = sheets
            .get_mut(table)
            .ok_or_else(|| TransportError::UnknownTable(table.to_string()))?;
        // Like the hosted sheet, writes past the current extent are refused.
        if !grid.contains(cell.row, cell.col) {
            return Err(TransportError::Other(format!(
                "cell {cell} is outside the {} x {} range of '{table}'",
                grid.len(),
                grid.width()
            )));
        }
        grid.set_cell(cell.row, cell.col, value);
        Ok(())
    }
}
