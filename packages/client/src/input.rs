//! Terminal input parsing.

pub const HELP: &str = "\
Commands:
  <text>           send a chat message
  /nick <name>     change your nickname
  /ping            ask the server for a heartbeat
  /connect         connect to the server
  /disconnect      close the connection
  /quit            leave the client
  /help            show this help";

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Chat(String),
    Nick(String),
    Ping,
    Connect,
    Disconnect,
    Quit,
    Help,
    /// A slash command that is unknown or missing its argument
    Invalid(String),
    Empty,
}

impl UserCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Chat(line.to_string());
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };
        match (name, argument) {
            ("nick", "") => Self::Invalid("Usage: /nick <name>".to_string()),
            ("nick", name) => Self::Nick(name.to_string()),
            ("ping", _) => Self::Ping,
            ("connect", _) => Self::Connect,
            ("disconnect", _) => Self::Disconnect,
            ("quit" | "exit", _) => Self::Quit,
            ("help", _) => Self::Help,
            (other, _) => Self::Invalid(format!("Unknown command /{other}. Type /help.")),
        }
    }
}
