// Typed league queries over fetched grids.
//
// Each call resolves its table from scratch; nothing is cached between calls.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

use super::grid::Grid;
use super::group::{assemble, Group};
use super::lookup::{find_first, find_pair};
use super::ranking::{rank, RankingPolicy};
use super::record::{columns, convert_all, FromRecord, MatchRecord, PlayerRecord, StandingsRecord};
use super::table::{Table, TableLayout};

/// A team's players plus its standings row.
pub type Roster = Group<PlayerRecord, StandingsRecord>;

/// Layouts of the three league tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTables {
    pub standings: TableLayout,
    pub players: TableLayout,
    pub fixtures: TableLayout,
}

impl Default for LeagueTables {
    fn default() -> Self {
        Self {
            standings: TableLayout::new("Standings"),
            players: TableLayout::new("Players"),
            fixtures: TableLayout::new("Fixtures"),
        }
    }
}

impl LeagueTables {
    /// Standings ordered by points.
    pub fn standings(
        &self,
        grid: &Grid,
        limit: Option<usize>,
    ) -> Result<Vec<StandingsRecord>, QueryError> {
        let table = Table::resolve(grid, &self.standings)?;
        let ranked = rank(
            table.schema(),
            table.records().collect(),
            &RankingPolicy::Points.sort_keys(),
            limit,
        )?;
        Ok(convert_all(&ranked)?)
    }

    /// Player leaderboard under `policy`.
    pub fn leaderboard(
        &self,
        grid: &Grid,
        policy: RankingPolicy,
        limit: Option<usize>,
    ) -> Result<Vec<PlayerRecord>, QueryError> {
        let table = Table::resolve(grid, &self.players)?;
        let ranked = rank(
            table.schema(),
            table.records().collect(),
            &policy.sort_keys(),
            limit,
        )?;
        Ok(convert_all(&ranked)?)
    }

    pub fn player(&self, grid: &Grid, name: &str) -> Result<PlayerRecord, QueryError> {
        let table = Table::resolve(grid, &self.players)?;
        let record = find_first(&table, columns::PLAYER, name)?;
        Ok(PlayerRecord::from_record(&record)?)
    }

    pub fn team_standing(&self, grid: &Grid, team: &str) -> Result<StandingsRecord, QueryError> {
        let table = Table::resolve(grid, &self.standings)?;
        let record = find_first(&table, columns::TEAM, team)?;
        Ok(StandingsRecord::from_record(&record)?)
    }

    /// Players of `team` from the player table with its standings row.
    pub fn roster(
        &self,
        players: &Grid,
        standings: &Grid,
        team: &str,
    ) -> Result<Roster, QueryError> {
        let members = Table::resolve(players, &self.players)?;
        let totals = Table::resolve(standings, &self.standings)?;
        let group = assemble(&members, columns::TEAM, &totals, columns::TEAM, team)?;
        Ok(group.try_map(
            |r| PlayerRecord::from_record(&r),
            |r| StandingsRecord::from_record(&r),
        )?)
    }

    /// Fixture rows between `a` and `b`: the first meeting and the
    /// `games - 1` rows after it.
    pub fn fixtures(
        &self,
        grid: &Grid,
        a: &str,
        b: &str,
        games: usize,
    ) -> Result<Vec<MatchRecord>, QueryError> {
        let table = Table::resolve(grid, &self.fixtures)?;
        let run = find_pair(&table, (columns::HOME, columns::AWAY), a, b, games)?;
        Ok(convert_all(&run)?)
    }
}
