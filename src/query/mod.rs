// Tabular query engine: schema resolution, lookups, ranking and grouping
// over text grids fetched from a spreadsheet.

pub mod grid;
pub mod group;
pub mod league;
pub mod lookup;
pub mod ranking;
pub mod record;
pub mod schema;
pub mod table;

pub use grid::Grid;
pub use group::{Group, Totals};
pub use league::{LeagueTables, Roster};
pub use ranking::{Direction, RankingPolicy, SortKey};
pub use record::{MatchRecord, PlayerRecord, StandingsRecord};
pub use schema::Schema;
pub use table::{Record, Table, TableLayout};
