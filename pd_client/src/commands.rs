use prisoners_dilemma::{Choice, RoomCode};
use std::fmt;

/// A line of user input, resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Open a new room
    Create,
    /// Take the free seat in a room
    Join(RoomCode),
    /// Play a choice in the current room
    Choose(Choice),
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `join` without a room code.
    JoinMissingCode,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinMissingCode => write!(f, "Join requires a room code (e.g., 'join AB12CD')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string into a [`Command`].
///
/// Keywords are case-insensitive; room codes are normalized on parse.
///
/// # Examples
///
/// ```
/// use pd_client::commands::{Command, parse_command};
/// use prisoners_dilemma::{Choice, RoomCode};
///
/// assert_eq!(parse_command("c"), Ok(Command::Choose(Choice::Cooperate)));
/// assert_eq!(parse_command("DEFECT"), Ok(Command::Choose(Choice::Defect)));
/// assert_eq!(
///     parse_command("join ab12cd"),
///     Ok(Command::Join(RoomCode::from("AB12CD")))
/// );
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let mut parts = input.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Err(ParseError::UnrecognizedCommand(String::new()));
    };

    match keyword.to_lowercase().as_str() {
        "create" | "new" => Ok(Command::Create),
        "join" => parts
            .next()
            .map(|code| Command::Join(RoomCode::from(code)))
            .ok_or(ParseError::JoinMissingCode),
        "c" | "cooperate" => Ok(Command::Choose(Choice::Cooperate)),
        "d" | "defect" => Ok(Command::Choose(Choice::Defect)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    }
}

/// Help text printed for `help`.
pub const HELP_TEXT: &str = "\
Commands:
  create            Open a new room and print its code
  join CODE         Join a friend's room
  c | cooperate     Cooperate this round
  d | defect        Defect this round
  help              Show this help
  quit              Disconnect and exit";
