//! Console commands read from stdin by the binary.

use std::fmt;
use std::str::FromStr;

use crate::domain::DeviceId;
use crate::error::ClientError;

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  list            show the device list
  detail <id>     show and follow one device
  on <id>         switch a device on
  off <id>        switch a device off
  add <code>      commission a device with a pairing code
  status          show the Matter server status and info
  logs            show recent server logs
  help            show this help
  quit            exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the device list.
    List,
    /// Request and follow one device's detail.
    Detail(DeviceId),
    /// Switch a device on (`true`) or off (`false`).
    Toggle(DeviceId, bool),
    /// Commission a device; the code may be empty and is validated later.
    Add(String),
    /// Print Matter server status and info.
    Status,
    /// Print buffered logs.
    Logs,
    /// Print the help text.
    Help,
    /// Exit.
    Quit,
}

impl Command {
    /// Parses one line of input. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidCommand`] for unknown commands or
    /// missing device ids.
    pub fn parse(line: &str) -> Result<Option<Self>, ClientError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "detail" | "show" => Self::Detail(device_arg(word, rest)?),
            "on" => Self::Toggle(device_arg(word, rest)?, true),
            "off" => Self::Toggle(device_arg(word, rest)?, false),
            "add" => Self::Add(rest.to_string()),
            "status" => Self::Status,
            "logs" | "log" => Self::Logs,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ClientError::InvalidCommand(line.to_string())),
        };
        Ok(Some(command))
    }
}

impl FromStr for Command {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)?.ok_or_else(|| ClientError::InvalidCommand(String::new()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Detail(id) => write!(f, "detail {id}"),
            Self::Toggle(id, true) => write!(f, "on {id}"),
            Self::Toggle(id, false) => write!(f, "off {id}"),
            Self::Add(code) => write!(f, "add {code}"),
            Self::Status => write!(f, "status"),
            Self::Logs => write!(f, "logs"),
            Self::Help => write!(f, "help"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

fn device_arg(word: &str, rest: &str) -> Result<DeviceId, ClientError> {
    match rest.split_whitespace().next() {
        Some(id) => Ok(DeviceId::from(id)),
        None => Err(ClientError::InvalidCommand(format!("{word}: missing device id"))),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        match Command::parse(line) {
            Ok(Some(command)) => command,
            other => panic!("unexpected parse of {line:?}: {other:?}"),
        }
    }

    #[test]
    fn parses_device_commands() {
        assert_eq!(parse("detail 4"), Command::Detail(DeviceId::from("4")));
        assert_eq!(parse("ON 4"), Command::Toggle(DeviceId::from("4"), true));
        assert_eq!(parse("  off   7 "), Command::Toggle(DeviceId::from("7"), false));
    }

    #[test]
    fn add_keeps_code_and_allows_empty() {
        assert_eq!(
            parse("add MT:Y.K9042C00KA0648G00"),
            Command::Add("MT:Y.K9042C00KA0648G00".to_string())
        );
        assert_eq!(parse("add"), Command::Add(String::new()));
    }

    #[test]
    fn blank_line_is_none() {
        let Ok(None) = Command::parse("   ") else {
            panic!("expected None");
        };
    }

    #[test]
    fn missing_id_is_invalid() {
        let Err(ClientError::InvalidCommand(msg)) = Command::parse("detail") else {
            panic!("expected InvalidCommand");
        };
        assert!(msg.contains("missing device id"));
    }

    #[test]
    fn unknown_word_is_invalid() {
        assert!(Command::parse("reboot 4").is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for line in ["list", "detail 4", "on 4", "off 4", "status", "logs", "help", "quit"] {
            assert_eq!(parse(line).to_string(), line);
        }
    }
}
