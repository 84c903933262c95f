// Grouped aggregation: member rows of one group plus its totals row.

use serde::Serialize;

use crate::error::QueryError;

use super::schema::keys_match;
use super::table::{Record, Table};

/// Whether the totals table had a row for the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "row", rename_all = "snake_case")]
pub enum Totals<T> {
    Available(T),
    /// The totals table has no row for this group. Never filled with zeros.
    Unavailable,
}

impl<T> Totals<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Totals::Available(t) => Some(t),
            Totals::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Totals::Available(_))
    }
}

/// Members of one group and the group's aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group<M, T> {
    /// Group name as written in the sheet (totals row first, else first member).
    pub key: String,
    pub members: Vec<M>,
    pub totals: Totals<T>,
}

impl<M, T> Group<M, T> {
    /// Convert members and totals, stopping at the first failure.
    pub fn try_map<M2, T2, E>(
        self,
        mut member: impl FnMut(M) -> Result<M2, E>,
        totals: impl FnOnce(T) -> Result<T2, E>,
    ) -> Result<Group<M2, T2>, E> {
        let members = self
            .members
            .into_iter()
            .map(&mut member)
            .collect::<Result<Vec<_>, E>>()?;
        let totals = match self.totals {
            Totals::Available(t) => Totals::Available(totals(t)?),
            Totals::Unavailable => Totals::Unavailable,
        };
        Ok(Group {
            key: self.key,
            members,
            totals,
        })
    }
}

/// Collect the rows of `members` whose `member_column` equals `group`, and
/// the first row of `totals` whose `totals_column` equals it.
///
/// Errors distinguish a known group without members (`EmptyGroup`) from a
/// group that neither table knows (`NoTotals`). A blank group is never known.
pub fn assemble<'m, 't>(
    members: &'m Table<'_>,
    member_column: &str,
    totals: &'t Table<'_>,
    totals_column: &str,
    group: &str,
) -> Result<Group<Record<'m>, Record<'t>>, QueryError> {
    let member_index = members.schema().require(member_column)?;
    let totals_index = totals.schema().require(totals_column)?;
    if group.trim().is_empty() {
        return Err(QueryError::NoTotals {
            group: String::new(),
        });
    }

    let matched: Vec<Record<'m>> = members
        .records()
        .filter(|r| keys_match(r.cell_at(member_index), group))
        .collect();
    let aggregate = totals
        .records()
        .find(|r| keys_match(r.cell_at(totals_index), group));

    match (matched.is_empty(), aggregate) {
        (true, Some(_)) => Err(QueryError::EmptyGroup {
            group: group.trim().to_string(),
        }),
        (true, None) => Err(QueryError::NoTotals {
            group: group.trim().to_string(),
        }),
        (false, aggregate) => {
            let key = aggregate
                .map(|r| r.cell_at(totals_index))
                .unwrap_or_else(|| matched[0].cell_at(member_index))
                .to_string();
            Ok(Group {
                key,
                members: matched,
                totals: aggregate.map_or(Totals::Unavailable, Totals::Available),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::grid::Grid;
    use crate::query::table::TableLayout;

    fn players() -> Grid {
        Grid::from_rows([
            vec!["Player", "Team", "Goals"],
            vec!["Ana", "Lions", "3"],
            vec!["Ben", "Tigers", "1"],
            vec!["Cy", "lions", "2"],
            vec!["Dee", "Wolves", "0"],
        ])
    }

    fn standings() -> Grid {
        Grid::from_rows([
            vec!["Team", "PTS"],
            vec!["Lions", "7"],
            vec!["Tigers", "4"],
            vec!["Eagles", "0"],
        ])
    }

    fn layouts() -> (TableLayout, TableLayout) {
        (TableLayout::new("Players"), TableLayout::new("Standings"))
    }

    #[test]
    fn test_group_with_totals() {
        let (pg, sg) = (players(), standings());
        let (pl, sl) = layouts();
        let members = Table::resolve(&pg, &pl).unwrap();
        let totals = Table::resolve(&sg, &sl).unwrap();

        let group = assemble(&members, "team", &totals, "team", "LIONS").unwrap();
        assert_eq!(group.key, "Lions");
        let names: Vec<_> = group
            .members
            .iter()
            .map(|r| r.text("player").unwrap())
            .collect();
        assert_eq!(names, vec!["Ana", "Cy"]);
        assert_eq!(group.totals.as_option().unwrap().int("pts").unwrap(), 7);
    }

    #[test]
    fn test_group_without_totals_row() {
        let (pg, sg) = (players(), standings());
        let (pl, sl) = layouts();
        let members = Table::resolve(&pg, &pl).unwrap();
        let totals = Table::resolve(&sg, &sl).unwrap();

        let group = assemble(&members, "team", &totals, "team", "wolves").unwrap();
        assert_eq!(group.key, "Wolves");
        assert_eq!(group.members.len(), 1);
        assert!(!group.totals.is_available());
    }

    #[test]
    fn test_known_team_without_members_is_empty_group() {
        let (pg, sg) = (players(), standings());
        let (pl, sl) = layouts();
        let members = Table::resolve(&pg, &pl).unwrap();
        let totals = Table::resolve(&sg, &sl).unwrap();

        let err = assemble(&members, "team", &totals, "team", "Eagles").unwrap_err();
        assert!(matches!(err, QueryError::EmptyGroup { ref group } if group == "Eagles"));
    }

    #[test]
    fn test_unknown_team_is_no_totals() {
        let (pg, sg) = (players(), standings());
        let (pl, sl) = layouts();
        let members = Table::resolve(&pg, &pl).unwrap();
        let totals = Table::resolve(&sg, &sl).unwrap();

        let err = assemble(&members, "team", &totals, "team", "Hawks").unwrap_err();
        assert!(matches!(err, QueryError::NoTotals { .. }));
    }

    #[test]
    fn test_blank_team_is_unknown() {
        let pg = Grid::from_rows([
            vec!["Player", "Team", "Goals"],
            vec!["Free Agent", "", "1"],
        ]);
        let sg = Grid::from_rows([vec!["Team", "PTS"], vec!["", "3"]]);
        let (pl, sl) = layouts();
        let members = Table::resolve(&pg, &pl).unwrap();
        let totals = Table::resolve(&sg, &sl).unwrap();

        for team in ["", "  "] {
            let err = assemble(&members, "team", &totals, "team", team).unwrap_err();
            assert!(matches!(err, QueryError::NoTotals { .. }));
        }
    }

    #[test]
    fn test_try_map_propagates_error() {
        let group: Group<i32, i32> = Group {
            key: "Lions".into(),
            members: vec![1, -1, 2],
            totals: Totals::Unavailable,
        };
        let result: Result<Group<u32, u32>, String> = group.try_map(
            |m| u32::try_from(m).map_err(|_| format!("negative {m}")),
            |t| u32::try_from(t).map_err(|_| "bad totals".to_string()),
        );
        assert_eq!(result.unwrap_err(), "negative -1");
    }
}
