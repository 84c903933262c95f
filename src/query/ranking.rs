// Multi-key ranking of table rows.
//
// Sorting is stable: rows that compare equal on every key keep their sheet
// order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::record::columns;
use super::schema::{normalize, Schema};
use super::table::{parse_count, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ascending,
    Descending,
}

/// One sort criterion. Lower `priority` values are compared first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub numeric: bool,
    pub direction: Direction,
    pub priority: u32,
}

impl SortKey {
    pub fn numeric(column: &str, direction: Direction, priority: u32) -> Self {
        Self {
            column: column.to_string(),
            numeric: true,
            direction,
            priority,
        }
    }

    pub fn text(column: &str, direction: Direction, priority: u32) -> Self {
        Self {
            column: column.to_string(),
            numeric: false,
            direction,
            priority,
        }
    }
}

/// Named leaderboard orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Points descending.
    Points,
    /// Goals descending, then fewer games played first.
    Goals,
    /// Assists descending, then fewer games played, then goals descending.
    Assists,
}

impl RankingPolicy {
    pub fn sort_keys(self) -> Vec<SortKey> {
        use Direction::*;
        match self {
            RankingPolicy::Points => vec![SortKey::numeric(columns::POINTS, Descending, 0)],
            RankingPolicy::Goals => vec![
                SortKey::numeric(columns::GOALS, Descending, 0),
                SortKey::numeric(columns::GAMES_PLAYED, Ascending, 1),
            ],
            RankingPolicy::Assists => vec![
                SortKey::numeric(columns::ASSISTS, Descending, 0),
                SortKey::numeric(columns::GAMES_PLAYED, Ascending, 1),
                SortKey::numeric(columns::GOALS, Descending, 2),
            ],
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "points" | "pts" => Some(Self::Points),
            "goals" => Some(Self::Goals),
            "assists" => Some(Self::Assists),
            _ => None,
        }
    }
}

struct ResolvedKey {
    index: usize,
    numeric: bool,
    direction: Direction,
}

/// Sort `records` by `keys` and keep at most `limit` of them.
///
/// Every key column must exist in `schema`, even when there are no rows.
pub fn rank<'a>(
    schema: &Schema,
    mut records: Vec<Record<'a>>,
    keys: &[SortKey],
    limit: Option<usize>,
) -> Result<Vec<Record<'a>>, SchemaError> {
    let mut ordered: Vec<&SortKey> = keys.iter().collect();
    ordered.sort_by_key(|k| k.priority);

    let resolved = ordered
        .into_iter()
        .map(|k| -> Result<ResolvedKey, SchemaError> {
            Ok(ResolvedKey {
                index: schema.require(&k.column)?,
                numeric: k.numeric,
                direction: k.direction,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    records.sort_by(|a, b| compare(a, b, &resolved));

    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(records)
}

fn compare(a: &Record<'_>, b: &Record<'_>, keys: &[ResolvedKey]) -> Ordering {
    for key in keys {
        let (x, y) = (a.cell_at(key.index), b.cell_at(key.index));
        let ord = if key.numeric {
            parse_count(x).cmp(&parse_count(y))
        } else {
            x.to_lowercase().cmp(&y.to_lowercase())
        };
        let ord = match key.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
