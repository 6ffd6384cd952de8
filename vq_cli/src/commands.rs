use std::fmt;
use volley_queue::{
    Criterion, GameMode, Gender, NewPlayer, PlayerId, Position, Priority, Side, parse_criteria,
};

/// A parsed line from the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Players,
    Add(NewPlayer),
    Toggle(PlayerId),
    Delete(Vec<PlayerId>),
    Present(PlayerId),
    Queue,
    Enqueue(PlayerId),
    Dequeue(PlayerId),
    Start(Option<GameMode>),
    End(Side),
    Sub { out: PlayerId, incoming: PlayerId },
    Suggest(PlayerId),
    Match,
    History(Option<usize>),
    Mode(GameMode),
    ShowPriority,
    SetPriority(Vec<Criterion>),
    MovePriority { from: usize, to: usize },
    ResetDay,
    ClearAll,
    Quit,
}

impl Command {
    /// Whether the command changes state worth saving.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::Help
                | Self::Players
                | Self::Queue
                | Self::Suggest(_)
                | Self::Match
                | Self::History(_)
                | Self::ShowPriority
                | Self::Quit
        )
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command is missing an argument.
    MissingArgument { usage: &'static str },
    /// Argument is not a valid player id.
    InvalidId(String),
    /// Argument is not a valid number.
    InvalidNumber(String),
    /// Argument failed to parse as a domain value.
    InvalidValue(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { usage } => write!(f, "Missing argument. Usage: '{usage}'"),
            Self::InvalidId(value) => {
                write!(f, "Invalid player id '{value}'. Ids are whole numbers")
            }
            Self::InvalidNumber(value) => {
                write!(f, "Invalid number '{value}'. Must be a positive whole number")
            }
            Self::InvalidValue(reason) => write!(f, "{reason}"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

const ADD_USAGE: &str = "add NAME POSITIONS PRIORITY GENDER";
const DELETE_USAGE: &str = "delete ID...";
const END_USAGE: &str = "end a|b";
const MODE_USAGE: &str = "mode 4v4|6v6";
const MOVE_USAGE: &str = "priority move FROM TO";
const SUB_USAGE: &str = "sub OUT IN";

/// Parse a command line into a [`Command`].
///
/// # Examples
///
/// ```
/// use vq_cli::commands::{Command, parse_command};
/// use volley_queue::{GameMode, Side};
///
/// assert_eq!(parse_command("queue"), Ok(Command::Queue));
/// assert_eq!(parse_command("start 4v4"), Ok(Command::Start(Some(GameMode::FourVFour))));
/// assert_eq!(parse_command("end b"), Ok(Command::End(Side::B)));
/// assert_eq!(parse_command("sub 3 9"), Ok(Command::Sub { out: 3, incoming: 9 }));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    match trimmed {
        "help" | "?" => return Ok(Command::Help),
        "players" => return Ok(Command::Players),
        "queue" => return Ok(Command::Queue),
        "match" => return Ok(Command::Match),
        "reset-day" => return Ok(Command::ResetDay),
        "clear-all" => return Ok(Command::ClearAll),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"add") => parse_add_command(&parts),
        Some(&"toggle") => Ok(Command::Toggle(id_arg(&parts, 1, "toggle ID")?)),
        Some(&"delete") => parse_delete_command(&parts),
        Some(&"present") => Ok(Command::Present(id_arg(&parts, 1, "present ID")?)),
        Some(&"enqueue") => Ok(Command::Enqueue(id_arg(&parts, 1, "enqueue ID")?)),
        Some(&"dequeue") => Ok(Command::Dequeue(id_arg(&parts, 1, "dequeue ID")?)),
        Some(&"start") => match parts.get(1) {
            Some(mode) => Ok(Command::Start(Some(parse_value(mode)?))),
            None => Ok(Command::Start(None)),
        },
        Some(&"end") => {
            let side = parts
                .get(1)
                .ok_or(ParseError::MissingArgument { usage: END_USAGE })?;
            Ok(Command::End(parse_value(side)?))
        }
        Some(&"sub") => Ok(Command::Sub {
            out: id_arg(&parts, 1, SUB_USAGE)?,
            incoming: id_arg(&parts, 2, SUB_USAGE)?,
        }),
        Some(&"suggest") => Ok(Command::Suggest(id_arg(&parts, 1, "suggest OUT")?)),
        Some(&"history") => match parts.get(1) {
            Some(count) => Ok(Command::History(Some(parse_number(count)?))),
            None => Ok(Command::History(None)),
        },
        Some(&"mode") => {
            let mode = parts
                .get(1)
                .ok_or(ParseError::MissingArgument { usage: MODE_USAGE })?;
            Ok(Command::Mode(parse_value(mode)?))
        }
        Some(&"priority") => parse_priority_command(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse an add command: "add NAME POSITIONS PRIORITY GENDER"
///
/// The name may contain spaces; the last three words are always the
/// positions (comma separated), priority and gender.
fn parse_add_command(parts: &[&str]) -> Result<Command, ParseError> {
    if parts.len() < 5 {
        return Err(ParseError::MissingArgument { usage: ADD_USAGE });
    }
    let tail = parts.len() - 3;
    let name = parts[1..tail].join(" ");
    let positions = parts[tail]
        .split(',')
        .filter(|s| !s.is_empty())
        .map(parse_value::<Position>)
        .collect::<Result<Vec<_>, _>>()?;
    let priority: Priority = parse_value(parts[tail + 1])?;
    let gender: Gender = parse_value(parts[tail + 2])?;
    Ok(Command::Add(NewPlayer::new(name, positions, priority, gender)))
}

/// Parse a delete command: "delete ID..."
fn parse_delete_command(parts: &[&str]) -> Result<Command, ParseError> {
    if parts.len() < 2 {
        return Err(ParseError::MissingArgument {
            usage: DELETE_USAGE,
        });
    }
    let ids = parts[1..]
        .iter()
        .map(|value| parse_id(value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Command::Delete(ids))
}

/// Parse a priority command: "priority", "priority LIST" or "priority move FROM TO"
fn parse_priority_command(parts: &[&str]) -> Result<Command, ParseError> {
    match (parts.get(1), parts.get(2), parts.get(3)) {
        (None, _, _) => Ok(Command::ShowPriority),
        (Some(&"move"), Some(from), Some(to)) => Ok(Command::MovePriority {
            from: parse_number(from)?,
            to: parse_number(to)?,
        }),
        (Some(&"move"), _, _) => Err(ParseError::MissingArgument { usage: MOVE_USAGE }),
        (Some(_), _, _) => {
            let list = parts[1..].join(",");
            let order =
                parse_criteria(&list).map_err(|e| ParseError::InvalidValue(e.to_string()))?;
            Ok(Command::SetPriority(order))
        }
    }
}

fn id_arg(parts: &[&str], index: usize, usage: &'static str) -> Result<PlayerId, ParseError> {
    let value = parts
        .get(index)
        .ok_or(ParseError::MissingArgument { usage })?;
    parse_id(value)
}

fn parse_id(value: &str) -> Result<PlayerId, ParseError> {
    value
        .parse::<PlayerId>()
        .map_err(|_| ParseError::InvalidId(value.to_string()))
}

fn parse_number(value: &str) -> Result<usize, ParseError> {
    value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidNumber(value.to_string()))
}

fn parse_value<T>(value: &str) -> Result<T, ParseError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ParseError::InvalidValue(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_word_commands() {
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("players"), Ok(Command::Players));
        assert_eq!(parse_command("queue"), Ok(Command::Queue));
        assert_eq!(parse_command("match"), Ok(Command::Match));
        assert_eq!(parse_command("reset-day"), Ok(Command::ResetDay));
        assert_eq!(parse_command("clear-all"), Ok(Command::ClearAll));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_command("  queue  "), Ok(Command::Queue));
        assert_eq!(parse_command("\tend   a\n"), Ok(Command::End(Side::A)));
    }

    #[test]
    fn test_parse_add() {
        let command = parse_command("add Ana Paula s,d member female").unwrap();
        assert_eq!(
            command,
            Command::Add(NewPlayer::new(
                "Ana Paula",
                vec![Position::Setter, Position::Defender],
                Priority::Member,
                Gender::Female,
            ))
        );
    }

    #[test]
    fn test_parse_add_long_forms() {
        let command = parse_command("add Bruno attacker visitor male").unwrap();
        assert!(matches!(command, Command::Add(ref p) if p.name == "Bruno"
            && p.positions == vec![Position::Attacker]
            && p.priority == Priority::Visitor
            && p.gender == Gender::Male));
    }

    #[test]
    fn test_parse_add_missing_fields() {
        assert_eq!(
            parse_command("add Ana s member"),
            Err(ParseError::MissingArgument { usage: ADD_USAGE })
        );
    }

    #[test]
    fn test_parse_add_bad_position() {
        assert!(matches!(
            parse_command("add Ana x member female"),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_id_commands() {
        assert_eq!(parse_command("toggle 4"), Ok(Command::Toggle(4)));
        assert_eq!(parse_command("present 7"), Ok(Command::Present(7)));
        assert_eq!(parse_command("enqueue 12"), Ok(Command::Enqueue(12)));
        assert_eq!(parse_command("dequeue 12"), Ok(Command::Dequeue(12)));
        assert_eq!(parse_command("suggest 3"), Ok(Command::Suggest(3)));
    }

    #[test]
    fn test_parse_invalid_id() {
        assert_eq!(
            parse_command("present abc"),
            Err(ParseError::InvalidId("abc".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_id() {
        assert_eq!(
            parse_command("enqueue"),
            Err(ParseError::MissingArgument {
                usage: "enqueue ID"
            })
        );
    }

    #[test]
    fn test_parse_delete_many() {
        assert_eq!(parse_command("delete 1 2 3"), Ok(Command::Delete(vec![1, 2, 3])));
        assert!(matches!(
            parse_command("delete"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_start() {
        assert_eq!(parse_command("start"), Ok(Command::Start(None)));
        assert_eq!(
            parse_command("start 6v6"),
            Ok(Command::Start(Some(GameMode::SixVSix)))
        );
        assert!(matches!(
            parse_command("start 5v5"),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_end() {
        assert_eq!(parse_command("end a"), Ok(Command::End(Side::A)));
        assert_eq!(parse_command("end B"), Ok(Command::End(Side::B)));
        assert!(matches!(
            parse_command("end"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_command("end c"),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_sub() {
        assert_eq!(
            parse_command("sub 3 9"),
            Ok(Command::Sub { out: 3, incoming: 9 })
        );
        assert!(matches!(
            parse_command("sub 3"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_history() {
        assert_eq!(parse_command("history"), Ok(Command::History(None)));
        assert_eq!(parse_command("history 5"), Ok(Command::History(Some(5))));
        assert_eq!(
            parse_command("history -1"),
            Err(ParseError::InvalidNumber("-1".to_string()))
        );
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_command("mode 4v4"), Ok(Command::Mode(GameMode::FourVFour)));
        assert!(parse_command("mode").is_err());
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_command("priority"), Ok(Command::ShowPriority));
        assert_eq!(
            parse_command("priority gender, setter, priority"),
            Ok(Command::SetPriority(vec![
                Criterion::Gender,
                Criterion::Setter,
                Criterion::Priority,
            ]))
        );
        assert_eq!(
            parse_command("priority move 3 1"),
            Ok(Command::MovePriority { from: 3, to: 1 })
        );
        assert!(matches!(
            parse_command("priority move 3"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_command("priority height"),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_priority_space_separated() {
        assert_eq!(
            parse_command("priority setter gender"),
            Ok(Command::SetPriority(vec![Criterion::Setter, Criterion::Gender]))
        );
        assert_eq!(
            parse_command("priority priority,setter gender"),
            Ok(Command::SetPriority(vec![
                Criterion::Priority,
                Criterion::Setter,
                Criterion::Gender,
            ]))
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        assert_eq!(
            parse_command("dance"),
            Err(ParseError::UnrecognizedCommand("dance".to_string()))
        );
        assert!(matches!(
            parse_command(""),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_mutating_commands() {
        assert!(parse_command("start").unwrap().is_mutating());
        assert!(parse_command("present 1").unwrap().is_mutating());
        assert!(!parse_command("queue").unwrap().is_mutating());
        assert!(!parse_command("suggest 1").unwrap().is_mutating());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::UnrecognizedCommand("xyz".to_string());
        assert!(err.to_string().contains("help"));
        let err = ParseError::MissingArgument { usage: SUB_USAGE };
        assert!(err.to_string().contains("sub OUT IN"));
    }
}
