// Typed records for each league table kind.

use serde::Serialize;

use crate::error::SchemaError;

use super::table::Record;

/// Header names the league tables are expected to carry (matched
/// case-insensitively).
pub mod columns {
    pub const TEAM: &str = "team";
    pub const GAMES_PLAYED: &str = "gp";
    pub const POINTS: &str = "pts";

    pub const WINS: &str = "w";
    pub const DRAWS: &str = "d";
    pub const LOSSES: &str = "l";
    pub const GOALS_FOR: &str = "gf";
    pub const GOALS_AGAINST: &str = "ga";
    pub const GOAL_DIFFERENCE: &str = "gd";

    pub const PLAYER: &str = "player";
    pub const GOALS: &str = "goals";
    pub const ASSISTS: &str = "assists";

    pub const HOME: &str = "home";
    pub const AWAY: &str = "away";
    pub const DATE: &str = "date";
    pub const RESULT: &str = "result";
}

/// Conversion from a schema-resolved row into a fixed-shape record.
pub trait FromRecord: Sized {
    fn from_record(record: &Record<'_>) -> Result<Self, SchemaError>;
}

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRecord {
    pub team: String,
    pub games_played: i64,
    pub wins: i64,
    pub draws: i64,
    pub losses: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: i64,
}

impl FromRecord for StandingsRecord {
    fn from_record(record: &Record<'_>) -> Result<Self, SchemaError> {
        let goals_for = record.int(columns::GOALS_FOR)?;
        let goals_against = record.int(columns::GOALS_AGAINST)?;
        Ok(Self {
            team: record.text(columns::TEAM)?.to_string(),
            games_played: record.int(columns::GAMES_PLAYED)?,
            wins: record.int(columns::WINS)?,
            draws: record.int(columns::DRAWS)?,
            losses: record.int(columns::LOSSES)?,
            goals_for,
            goals_against,
            // Some sheets leave GD as a formula column nobody filled in.
            goal_difference: record
                .optional_int(columns::GOAL_DIFFERENCE)
                .unwrap_or(goals_for - goals_against),
            points: record.int(columns::POINTS)?,
        })
    }
}

/// One row of the player statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub games_played: i64,
    pub goals: i64,
    pub assists: i64,
    /// Only present when the sheet has a points column.
    pub points: Option<i64>,
}

impl FromRecord for PlayerRecord {
    fn from_record(record: &Record<'_>) -> Result<Self, SchemaError> {
        Ok(Self {
            name: record.text(columns::PLAYER)?.to_string(),
            team: record.text(columns::TEAM)?.to_string(),
            games_played: record.int(columns::GAMES_PLAYED)?,
            goals: record.int(columns::GOALS)?,
            assists: record.int(columns::ASSISTS)?,
            points: record.optional_int(columns::POINTS),
        })
    }
}

/// One fixture row: two participants plus optional date and result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub home: String,
    pub away: String,
    pub date: Option<String>,
    pub result: Option<String>,
}

impl FromRecord for MatchRecord {
    fn from_record(record: &Record<'_>) -> Result<Self, SchemaError> {
        let non_blank = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Ok(Self {
            home: record.text(columns::HOME)?.to_string(),
            away: record.text(columns::AWAY)?.to_string(),
            date: record.optional_text(columns::DATE).and_then(non_blank),
            result: record.optional_text(columns::RESULT).and_then(non_blank),
        })
    }
}

/// Convert a batch of rows, failing on the first schema problem.
pub fn convert_all<T: FromRecord>(records: &[Record<'_>]) -> Result<Vec<T>, SchemaError> {
    records.iter().map(T::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::grid::Grid;
    use crate::query::table::{Table, TableLayout};

    #[test]
    fn test_standings_record() {
        let grid = Grid::from_rows([
            vec!["Team", "GP", "W", "D", "L", "GF", "GA", "GD", "PTS"],
            vec!["Lions", "3", "2", "1", "0", "5", "2", "3", "7"],
        ]);
        let layout = TableLayout::new("Standings");
        let table = Table::resolve(&grid, &layout).unwrap();
        let record = table.records().next().unwrap();
        let lions = StandingsRecord::from_record(&record).unwrap();
        assert_eq!(lions.team, "Lions");
        assert_eq!(lions.games_played, 3);
        assert_eq!(lions.goal_difference, 3);
        assert_eq!(lions.points, 7);
    }

    #[test]
    fn test_standings_without_goal_difference_column() {
        let grid = Grid::from_rows([
            vec!["Team", "GP", "W", "D", "L", "GF", "GA", "PTS"],
            vec!["Tigers", "3", "1", "1", "1", "4", "6", "4"],
        ]);
        let layout = TableLayout::new("Standings");
        let table = Table::resolve(&grid, &layout).unwrap();
        let tigers = StandingsRecord::from_record(&table.records().next().unwrap()).unwrap();
        assert_eq!(tigers.goal_difference, -2);
    }

    #[test]
    fn test_player_record_with_dnp() {
        let grid = Grid::from_rows([
            vec!["Player", "Team", "GP", "Goals", "Assists"],
            vec!["Ana", "Lions", "DNP", "", "2"],
        ]);
        let layout = TableLayout::new("Players");
        let table = Table::resolve(&grid, &layout).unwrap();
        let ana = PlayerRecord::from_record(&table.records().next().unwrap()).unwrap();
        assert_eq!(ana.games_played, 0);
        assert_eq!(ana.goals, 0);
        assert_eq!(ana.assists, 2);
        assert_eq!(ana.points, None);
    }

    #[test]
    fn test_player_record_requires_assists() {
        let grid = Grid::from_rows([
            vec!["Player", "Team", "GP", "Goals"],
            vec!["Ana", "Lions", "1", "1"],
        ]);
        let layout = TableLayout::new("Players");
        let table = Table::resolve(&grid, &layout).unwrap();
        let err = PlayerRecord::from_record(&table.records().next().unwrap()).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn("assists".into()));
    }

    #[test]
    fn test_match_record_optional_fields() {
        let grid = Grid::from_rows([
            vec!["Date", "Home", "Away", "Result"],
            vec!["2024-05-01", "Lions", "Tigers", ""],
        ]);
        let layout = TableLayout::new("Fixtures");
        let table = Table::resolve(&grid, &layout).unwrap();
        let fixture = MatchRecord::from_record(&table.records().next().unwrap()).unwrap();
        assert_eq!(fixture.date.as_deref(), Some("2024-05-01"));
        assert_eq!(fixture.result, None);
    }
}
