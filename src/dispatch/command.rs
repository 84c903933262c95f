// Chat command parsing.

use crate::query::RankingPolicy;
use crate::sheets::CellRef;

use super::CommandError;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
pub const MAX_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Help,
    Standings { limit: Option<usize> },
    Leaderboard { policy: RankingPolicy, limit: usize },
    Player { name: String },
    Team { name: String },
    Fixture { a: String, b: String, games: usize },
    SetCell { table: String, cell: CellRef, value: String },
}

impl Command {
    /// Parse a chat message.
    ///
    /// Returns `None` when the message is not addressed to the bot (wrong
    /// prefix or unknown command name), and `Some(Err(..))` when a known
    /// command has bad arguments.
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Command, CommandError>> {
        Self::parse_named(prefix, content).map(|(_, parsed)| parsed)
    }

    /// Like [`Command::parse`], also returning the canonical name of the
    /// command word (aliases folded), for logs and metric labels.
    pub fn parse_named(
        prefix: &str,
        content: &str,
    ) -> Option<(&'static str, Result<Command, CommandError>)> {
        let body = content.trim().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let word = words.next()?.to_lowercase();
        let args: Vec<&str> = words.collect();

        let named = match word.as_str() {
            "ping" => ("ping", Ok(Command::Ping)),
            "help" => ("help", Ok(Command::Help)),
            "standings" | "table" => (
                "standings",
                parse_limit(&args, "standings [count]").map(|limit| Command::Standings { limit }),
            ),
            "topscorers" | "goals" => (
                "topscorers",
                leaderboard(RankingPolicy::Goals, &args, "topscorers [count]"),
            ),
            "topassists" | "assists" => (
                "topassists",
                leaderboard(RankingPolicy::Assists, &args, "topassists [count]"),
            ),
            "toppoints" | "points" => (
                "toppoints",
                leaderboard(RankingPolicy::Points, &args, "toppoints [count]"),
            ),
            "player" | "stats" => (
                "player",
                required_text(&args, "player <name>").map(|name| Command::Player { name }),
            ),
            "team" | "roster" => (
                "team",
                required_text(&args, "team <name>").map(|name| Command::Team { name }),
            ),
            "match" | "fixture" => (
                "match",
                parse_pair(&args, false, "match <team> vs <team>")
                    .map(|(a, b, _)| Command::Fixture { a, b, games: 1 }),
            ),
            "series" => (
                "series",
                parse_pair(&args, true, "series <team> vs <team> <games>")
                    .map(|(a, b, games)| Command::Fixture { a, b, games }),
            ),
            "setcell" => ("setcell", parse_set_cell(&args)),
            _ => return None,
        };
        Some(named)
    }
}

fn parse_limit(args: &[&str], usage: &'static str) -> Result<Option<usize>, CommandError> {
    match args {
        [] => Ok(None),
        [n] => match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n.min(MAX_LIMIT))),
            _ => Err(CommandError::Usage(usage)),
        },
        _ => Err(CommandError::Usage(usage)),
    }
}

fn leaderboard(
    policy: RankingPolicy,
    args: &[&str],
    usage: &'static str,
) -> Result<Command, CommandError> {
    let limit = parse_limit(args, usage)?.unwrap_or(DEFAULT_LEADERBOARD_SIZE);
    Ok(Command::Leaderboard { policy, limit })
}

fn required_text(args: &[&str], usage: &'static str) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(args.join(" "))
}

/// `<team a> vs <team b> [games]`; team names may contain spaces.
fn parse_pair(
    args: &[&str],
    with_games: bool,
    usage: &'static str,
) -> Result<(String, String, usize), CommandError> {
    let (args, games) = if with_games {
        match args.split_last() {
            Some((last, rest)) => match last.parse::<usize>() {
                Ok(n) if n > 0 => (rest, n.min(MAX_LIMIT)),
                _ => return Err(CommandError::Usage(usage)),
            },
            None => return Err(CommandError::Usage(usage)),
        }
    } else {
        (args, 1)
    };

    let split = args
        .iter()
        .position(|w| w.eq_ignore_ascii_case("vs") || w.eq_ignore_ascii_case("v"))
        .ok_or(CommandError::Usage(usage))?;
    let (left, right) = (&args[..split], &args[split + 1..]);
    if left.is_empty() || right.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok((left.join(" "), right.join(" "), games))
}

fn parse_set_cell(args: &[&str]) -> Result<Command, CommandError> {
    const USAGE: &str = "setcell <sheet> <cell> <value>";
    match args {
        [table, cell, value @ ..] if !value.is_empty() => {
            let cell: CellRef = cell.parse()?;
            Ok(Command::SetCell {
                table: table.to_string(),
                cell,
                value: value.join(" "),
            })
        }
        _ => Err(CommandError::Usage(USAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Option<Result<Command, CommandError>> {
        Command::parse("!", content)
    }

    #[test]
    fn test_ignores_non_commands() {
        assert!(parse("hello there").is_none());
        assert!(parse("!").is_none());
        assert!(parse("!dance").is_none());
        assert!(Command::parse("?", "!ping").is_none());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("!ping").unwrap().unwrap(), Command::Ping);
        assert_eq!(parse("  !PING  ").unwrap().unwrap(), Command::Ping);
        assert_eq!(parse("!help").unwrap().unwrap(), Command::Help);
    }

    #[test]
    fn test_leaderboard_limits() {
        assert_eq!(
            parse("!topscorers").unwrap().unwrap(),
            Command::Leaderboard {
                policy: RankingPolicy::Goals,
                limit: 10
            }
        );
        assert_eq!(
            parse("!topassists 3").unwrap().unwrap(),
            Command::Leaderboard {
                policy: RankingPolicy::Assists,
                limit: 3
            }
        );
        assert_eq!(
            parse("!toppoints 500").unwrap().unwrap(),
            Command::Leaderboard {
                policy: RankingPolicy::Points,
                limit: MAX_LIMIT
            }
        );
        assert!(matches!(
            parse("!topscorers lots"),
            Some(Err(CommandError::Usage(_)))
        ));
        assert!(matches!(
            parse("!topscorers 0"),
            Some(Err(CommandError::Usage(_)))
        ));
    }

    #[test]
    fn test_standings_limit_optional() {
        assert_eq!(
            parse("!standings").unwrap().unwrap(),
            Command::Standings { limit: None }
        );
        assert_eq!(
            parse("!table 4").unwrap().unwrap(),
            Command::Standings { limit: Some(4) }
        );
    }

    #[test]
    fn test_names_with_spaces() {
        assert_eq!(
            parse("!player Ana  de Souza").unwrap().unwrap(),
            Command::Player {
                name: "Ana de Souza".into()
            }
        );
        assert_eq!(
            parse("!team Red Lions").unwrap().unwrap(),
            Command::Team {
                name: "Red Lions".into()
            }
        );
        assert!(matches!(parse("!team"), Some(Err(CommandError::Usage(_)))));
    }

    #[test]
    fn test_match_and_series() {
        assert_eq!(
            parse("!match Red Lions vs Tigers").unwrap().unwrap(),
            Command::Fixture {
                a: "Red Lions".into(),
                b: "Tigers".into(),
                games: 1
            }
        );
        assert_eq!(
            parse("!series Lions VS Tigers 3").unwrap().unwrap(),
            Command::Fixture {
                a: "Lions".into(),
                b: "Tigers".into(),
                games: 3
            }
        );
        assert!(matches!(
            parse("!match Lions Tigers"),
            Some(Err(CommandError::Usage(_)))
        ));
        assert!(matches!(
            parse("!match vs Tigers"),
            Some(Err(CommandError::Usage(_)))
        ));
        assert!(matches!(
            parse("!series Lions vs Tigers"),
            Some(Err(CommandError::Usage(_)))
        ));
    }

    #[test]
    fn test_set_cell() {
        assert_eq!(
            parse("!setcell Standings I2 10").unwrap().unwrap(),
            Command::SetCell {
                table: "Standings".into(),
                cell: CellRef::new(1, 8),
                value: "10".into()
            }
        );
        assert!(matches!(
            parse("!setcell Standings 2I 10"),
            Some(Err(CommandError::InvalidCell(_)))
        ));
        assert!(matches!(
            parse("!setcell Standings I2"),
            Some(Err(CommandError::Usage(_)))
        ));
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(Command::parse("$", "$ping").unwrap().unwrap(), Command::Ping);
    }

    #[test]
    fn test_command_names() {
        let name = |content| Command::parse_named("!", content).map(|(name, _)| name);
        assert_eq!(name("!series A vs B 2"), Some("series"));
        assert_eq!(name("!fixture A vs B"), Some("match"));
        assert_eq!(name("!goals"), Some("topscorers"));
        assert_eq!(name("!chat hello"), None);
    }

    #[test]
    fn test_name_survives_bad_arguments() {
        let (name, parsed) = Command::parse_named("!", "!series Lions vs Tigers").unwrap();
        assert_eq!(name, "series");
        assert!(matches!(parsed, Err(CommandError::Usage(_))));

        let (name, parsed) = Command::parse_named("!", "!setcell Standings 2I 10").unwrap();
        assert_eq!(name, "setcell");
        assert!(matches!(parsed, Err(CommandError::InvalidCell(_))));
    }
}
