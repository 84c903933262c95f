// Text rendering of query results for chat replies.

use std::fmt::Write;

use crate::error::QueryError;
use crate::query::{MatchRecord, PlayerRecord, RankingPolicy, Roster, StandingsRecord, Totals};

use super::CommandError;

pub const REJECTED: &str = "Not now. Try again in a moment.";

pub fn help(prefix: &str) -> String {
    let lines = [
        ("ping", "check the bot is awake"),
        ("standings [count]", "league table"),
        ("topscorers [count]", "most goals"),
        ("topassists [count]", "most assists"),
        ("toppoints [count]", "most points"),
        ("player <name>", "one player's stats"),
        ("team <name>", "team roster and record"),
        ("match <team> vs <team>", "fixture between two teams"),
        ("series <team> vs <team> <games>", "all games of a series"),
        ("setcell <sheet> <cell> <value>", "update one cell"),
    ];
    let mut out = String::from("Commands:\n");
    for (usage, what) in lines {
        let _ = writeln!(out, "`{prefix}{usage}` - {what}");
    }
    out.trim_end().to_string()
}

pub fn standings(rows: &[StandingsRecord]) -> String {
    if rows.is_empty() {
        return "The standings table is empty.".to_string();
    }
    let width = rows
        .iter()
        .map(|r| r.team.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::from("```\n");
    let _ = writeln!(
        out,
        "{:>2}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>3}",
        "#", "Team", "GP", "W", "D", "L", "GF", "GA", "GD", "PTS"
    );
    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}  {:<width$}  {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>+4} {:>3}",
            i + 1,
            r.team,
            r.games_played,
            r.wins,
            r.draws,
            r.losses,
            r.goals_for,
            r.goals_against,
            r.goal_difference,
            r.points
        );
    }
    out.push_str("```");
    out
}

pub fn leaderboard(policy: RankingPolicy, players: &[PlayerRecord]) -> String {
    let title = match policy {
        RankingPolicy::Points => "Top points",
        RankingPolicy::Goals => "Top scorers",
        RankingPolicy::Assists => "Top assists",
    };
    if players.is_empty() {
        return format!("{title}: no players recorded yet.");
    }

    let mut out = format!("**{title}**\n");
    for (i, p) in players.iter().enumerate() {
        let stat = match policy {
            RankingPolicy::Points => plural(p.points.unwrap_or(0), "point"),
            RankingPolicy::Goals => plural(p.goals, "goal"),
            RankingPolicy::Assists => plural(p.assists, "assist"),
        };
        let _ = writeln!(
            out,
            "{}. {} ({}) - {} in {}",
            i + 1,
            p.name,
            p.team,
            stat,
            plural(p.games_played, "game")
        );
    }
    out.trim_end().to_string()
}

pub fn player(p: &PlayerRecord) -> String {
    let mut out = format!(
        "**{}** ({})\nGP: {} | Goals: {} | Assists: {}",
        p.name, p.team, p.games_played, p.goals, p.assists
    );
    if let Some(points) = p.points {
        let _ = write!(out, " | Points: {points}");
    }
    out
}

pub fn roster(roster: &Roster) -> String {
    let mut out = format!("**{}**\n", roster.key);
    match &roster.totals {
        Totals::Available(t) => {
            let _ = writeln!(
                out,
                "Record {}-{}-{} | {} | GF {} GA {} GD {:+}",
                t.wins,
                t.draws,
                t.losses,
                plural(t.points, "pt"),
                t.goals_for,
                t.goals_against,
                t.goal_difference
            );
        }
        Totals::Unavailable => out.push_str("No standings row for this team.\n"),
    }
    for p in &roster.members {
        let _ = writeln!(
            out,
            "- {}: {} G, {} A in {} GP",
            p.name, p.goals, p.assists, p.games_played
        );
    }
    out.trim_end().to_string()
}

pub fn fixtures(games: &[MatchRecord]) -> String {
    games
        .iter()
        .map(|m| {
            let mut line = format!("{} vs {}", m.home, m.away);
            if let Some(date) = &m.date {
                let _ = write!(line, " - {date}");
            }
            match &m.result {
                Some(result) => {
                    let _ = write!(line, " - {result}");
                }
                None => line.push_str(" - not played yet"),
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// User-facing message for a failed command.
pub fn error(prefix: &str, err: &CommandError) -> String {
    match err {
        CommandError::Usage(usage) => format!("Usage: `{prefix}{usage}`"),
        CommandError::InvalidCell(e) => format!("{e}. Use A1 notation, like B7."),
        CommandError::WritesDisabled => "Sheet updates are turned off.".to_string(),
        CommandError::Query(e) => query_error(e),
    }
}

fn query_error(err: &QueryError) -> String {
    match err {
        QueryError::NotFound { table, key } => format!("Couldn't find \"{key}\" in {table}."),
        QueryError::NoTotals { group } => format!("Unknown team \"{group}\"."),
        QueryError::EmptyGroup { group } => format!("{group} has no recorded players yet."),
        QueryError::Schema(e) => {
            format!("The league sheet is malformed ({e}). Ask an admin to check its layout.")
        }
        QueryError::Transport(_) => {
            "The league sheet is unavailable right now. Try again later.".to_string()
        }
    }
}

fn plural(n: i64, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
