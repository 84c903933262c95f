// Header row resolution: column name -> column index.

use std::collections::HashMap;

use crate::error::SchemaError;

use super::grid::Grid;

/// Mapping from normalized column name to zero-based column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: HashMap<String, usize>,
}

impl Schema {
    /// Resolve the schema from the header row at `header_row` (zero-based).
    ///
    /// Names are trimmed and lower-cased. When two header cells normalize to
    /// the same name the later column wins. Blank header cells are skipped.
    pub fn resolve(grid: &Grid, header_row: usize) -> Result<Self, SchemaError> {
        let header = grid.row(header_row).ok_or(SchemaError::HeaderOutOfRange {
            row: header_row,
            rows: grid.len(),
        })?;

        let mut columns = HashMap::with_capacity(header.len());
        for (index, name) in header.iter().enumerate() {
            let name = normalize(name);
            if name.is_empty() {
                continue;
            }
            columns.insert(name, index);
        }
        Ok(Self { columns })
    }

    /// Column index for `name`, matched case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.get(&normalize(name)).copied()
    }

    pub fn require(&self, name: &str) -> Result<usize, SchemaError> {
        self.index_of(name)
            .ok_or_else(|| SchemaError::MissingColumn(normalize(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Normalize a column name or key for comparison.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive, whitespace-trimmed equality of two keys.
pub fn keys_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings() -> Grid {
        Grid::from_rows([
            vec!["Team", "GP", "W", "D", "L", "GF", "GA", "GD", "PTS"],
            vec!["Lions", "3", "2", "1", "0", "5", "2", "3", "7"],
        ])
    }

    #[test]
    fn test_resolve_normalizes_names() {
        let grid = Grid::from_rows([vec!["  Team ", "GP", "Pts"]]);
        let schema = Schema::resolve(&grid, 0).unwrap();
        assert_eq!(schema.index_of("team"), Some(0));
        assert_eq!(schema.index_of("TEAM"), Some(0));
        assert_eq!(schema.index_of(" gp "), Some(1));
        assert_eq!(schema.index_of("PTS"), Some(2));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let grid = Grid::from_rows([vec!["Goals", "Team", "goals "]]);
        let schema = Schema::resolve(&grid, 0).unwrap();
        assert_eq!(schema.index_of("goals"), Some(2));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_header_out_of_range() {
        let err = Schema::resolve(&standings(), 6).unwrap_err();
        assert_eq!(err, SchemaError::HeaderOutOfRange { row: 6, rows: 2 });
    }

    #[test]
    fn test_header_on_later_row() {
        let grid = Grid::from_rows([
            vec!["League table"],
            vec![],
            vec![],
            vec!["Player", "Goals"],
            vec!["Ana", "4"],
        ]);
        let schema = Schema::resolve(&grid, 3).unwrap();
        assert_eq!(schema.index_of("player"), Some(0));
        assert!(!schema.contains("league table"));
    }

    #[test]
    fn test_missing_column_is_error() {
        let schema = Schema::resolve(&standings(), 0).unwrap();
        assert_eq!(
            schema.require("Assists"),
            Err(SchemaError::MissingColumn("assists".into()))
        );
    }

    #[test]
    fn test_blank_header_cells_skipped() {
        let grid = Grid::from_rows([vec!["Team", "", " ", "PTS"]]);
        let schema = Schema::resolve(&grid, 0).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index_of("pts"), Some(3));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let grid = standings();
        let first = Schema::resolve(&grid, 0).unwrap();
        let second = Schema::resolve(&grid, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("Lions", " lions "));
        assert!(keys_match("ÉCLAIR", "éclair"));
        assert!(!keys_match("Lions", "Tigers"));
    }
}
