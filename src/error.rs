// Error taxonomy shared by the query engine and the spreadsheet clients.

use thiserror::Error;

/// Failure reported by a spreadsheet backend. Opaque to the query engine.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("spreadsheet returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("invalid spreadsheet url: {0}")]
    Url(String),

    #[error("{0}")]
    Other(String),
}

/// Result of a query that could not produce a value.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The table does not have the expected shape.
    #[error("malformed table: {0}")]
    Schema(#[from] SchemaError),

    #[error("no row in '{table}' matches '{key}'")]
    NotFound { table: String, key: String },

    /// The group is known to the totals table but has no member rows.
    #[error("'{group}' has no member rows")]
    EmptyGroup { group: String },

    /// The group resolves in neither the members nor the totals table.
    #[error("'{group}' has no member rows and no totals row")]
    NoTotals { group: String },

    #[error("upstream unavailable: {0}")]
    Transport(#[from] TransportError),
}

impl QueryError {
    pub fn not_found(table: &str, key: impl Into<String>) -> Self {
        QueryError::NotFound {
            table: table.to_string(),
            key: key.into(),
        }
    }

    /// Coarse category used for user-facing messages and metric labels.
    pub fn category(&self) -> ErrorCategory {
        match self {
            QueryError::NotFound { .. } | QueryError::NoTotals { .. } => {
                ErrorCategory::UnknownEntity
            }
            QueryError::EmptyGroup { .. } => ErrorCategory::EmptyGroup,
            QueryError::Schema(_) => ErrorCategory::MalformedTable,
            QueryError::Transport(_) => ErrorCategory::UpstreamUnavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UnknownEntity,
    EmptyGroup,
    MalformedTable,
    UpstreamUnavailable,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::UnknownEntity => "unknown_entity",
            ErrorCategory::EmptyGroup => "empty_group",
            ErrorCategory::MalformedTable => "malformed_table",
            ErrorCategory::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("header row {row} is out of range (table has {rows} rows)")]
    HeaderOutOfRange { row: usize, rows: usize },

    #[error("column '{0}' is missing from the header")]
    MissingColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_distinct() {
        let unknown = QueryError::not_found("players", "Nobody");
        let empty = QueryError::EmptyGroup {
            group: "Eagles".into(),
        };
        let schema = QueryError::from(SchemaError::MissingColumn("pts".into()));
        let transport = QueryError::from(TransportError::Other("offline".into()));

        assert_eq!(unknown.category(), ErrorCategory::UnknownEntity);
        assert_eq!(empty.category(), ErrorCategory::EmptyGroup);
        assert_eq!(schema.category(), ErrorCategory::MalformedTable);
        assert_eq!(transport.category(), ErrorCategory::UpstreamUnavailable);
    }

    #[test]
    fn test_no_totals_is_unknown_entity() {
        let err = QueryError::NoTotals {
            group: "Eagles".into(),
        };
        assert_eq!(err.category(), ErrorCategory::UnknownEntity);
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::HeaderOutOfRange { row: 7, rows: 3 };
        assert_eq!(
            err.to_string(),
            "header row 7 is out of range (table has 3 rows)"
        );
    }
}
