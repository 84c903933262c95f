// A grid viewed through its header: layout, schema and data rows.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::grid::{is_blank_row, Grid};
use super::schema::Schema;

/// Where a logical table lives inside a worksheet.
///
/// The header row and row cap are caller configuration. Nothing checks that
/// the upstream sheet still has this shape beyond the header row existing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Worksheet name.
    pub sheet: String,
    /// Zero-based index of the header row.
    pub header_row: usize,
    /// Maximum number of rows after the header that belong to the table.
    pub max_rows: Option<usize>,
}

impl TableLayout {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            header_row: 0,
            max_rows: None,
        }
    }

    /// Set the header row by its 1-based spreadsheet row number.
    pub fn header_at_sheet_row(mut self, row_number: usize) -> Self {
        self.header_row = row_number.saturating_sub(1);
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Resolved view over a grid. Borrowed for the duration of one query.
#[derive(Debug)]
pub struct Table<'g> {
    name: &'g str,
    grid: &'g Grid,
    schema: Schema,
    start: usize,
    end: usize,
}

impl<'g> Table<'g> {
    pub fn resolve(grid: &'g Grid, layout: &'g TableLayout) -> Result<Self, SchemaError> {
        let schema = Schema::resolve(grid, layout.header_row)?;
        let start = layout.header_row + 1;
        let end = match layout.max_rows {
            Some(max) => grid.len().min(start.saturating_add(max)),
            None => grid.len(),
        };
        Ok(Self {
            name: &layout.sheet,
            grid,
            schema,
            start,
            end,
        })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Data rows in grid order, skipping rows that are entirely blank.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        let rows = self.grid.rows().get(self.start..self.end).unwrap_or(&[]);
        rows.iter()
            .enumerate()
            .filter(|(_, cells)| !is_blank_row(cells))
            .map(move |(offset, cells)| Record {
                schema: &self.schema,
                cells: cells.as_slice(),
                row: self.start + offset,
            })
    }
}

/// One data row read through a schema.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    schema: &'a Schema,
    cells: &'a [String],
    row: usize,
}

impl<'a> Record<'a> {
    /// Zero-based row index in the source grid.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Trimmed text of a column. A missing cell reads as "".
    pub fn text(&self, column: &str) -> Result<&'a str, SchemaError> {
        let index = self.schema.require(column)?;
        Ok(self.cell_at(index))
    }

    /// Text of a column that may not exist in every sheet.
    pub fn optional_text(&self, column: &str) -> Option<&'a str> {
        self.schema.index_of(column).map(|i| self.cell_at(i))
    }

    /// Integer value of a column, 0 when the cell is not a number.
    pub fn int(&self, column: &str) -> Result<i64, SchemaError> {
        self.text(column).map(parse_count)
    }

    pub fn optional_int(&self, column: &str) -> Option<i64> {
        self.optional_text(column).map(parse_count)
    }

    pub(crate) fn cell_at(&self, index: usize) -> &'a str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or("")
    }
}

/// Parse a numeric cell. Blank or non-integer text ("DNP", "-", "3.5") is 0.
pub fn parse_count(cell: &str) -> i64 {
    cell.trim().parse().unwrap_or(0)
}
