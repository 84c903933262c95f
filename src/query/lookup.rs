// Key lookups: single-column point lookup and unordered pair lookup.

use crate::error::QueryError;

use super::schema::keys_match;
use super::table::{Record, Table};

/// First row whose `column` equals `key`, compared case-insensitively.
///
/// When several rows share the key the earliest one in the sheet is returned.
/// A blank key matches nothing.
pub fn find_first<'t>(
    table: &'t Table<'_>,
    column: &str,
    key: &str,
) -> Result<Record<'t>, QueryError> {
    let index = table.schema().require(column)?;
    if key.trim().is_empty() {
        return Err(QueryError::not_found(table.name(), ""));
    }
    table
        .records()
        .find(|r| keys_match(r.cell_at(index), key))
        .ok_or_else(|| QueryError::not_found(table.name(), key.trim()))
}

/// Rows for the event between `a` and `b`, in either column order.
///
/// Scans for the first row whose two participant cells are {a, b} and
/// returns it together with the following rows, `count` rows in total
/// (series stored in adjacent rows). A `count` of 0 behaves like 1, and the
/// run stops early at the end of the table.
pub fn find_pair<'t>(
    table: &'t Table<'_>,
    columns: (&str, &str),
    a: &str,
    b: &str,
    count: usize,
) -> Result<Vec<Record<'t>>, QueryError> {
    let first = table.schema().require(columns.0)?;
    let second = table.schema().require(columns.1)?;
    if a.trim().is_empty() || b.trim().is_empty() {
        return Err(QueryError::not_found(
            table.name(),
            format!("{} vs {}", a.trim(), b.trim()),
        ));
    }

    let is_pair = |r: &Record<'_>| {
        let (x, y) = (r.cell_at(first), r.cell_at(second));
        (keys_match(x, a) && keys_match(y, b)) || (keys_match(x, b) && keys_match(y, a))
    };

    let run: Vec<Record<'t>> = table
        .records()
        .skip_while(|r| !is_pair(r))
        .take(count.max(1))
        .collect();

    if run.is_empty() {
        return Err(QueryError::not_found(
            table.name(),
            format!("{} vs {}", a.trim(), b.trim()),
        ));
    }
    Ok(run)
}
