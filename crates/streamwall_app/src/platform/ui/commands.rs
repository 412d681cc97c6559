//! Line commands typed at the wall prompt.
//!
//! A line whose first word is not a command name is treated as an address to
//! add, so pasting a playlist address and pressing Enter works as expected.

use std::path::PathBuf;

use streamwall_core::{AppViewModel, Msg};
use thiserror::Error;

/// Card selector: a 1-based position or the address itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardRef {
    Index(usize),
    Address(String),
}

impl CardRef {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(index) => CardRef::Index(index),
            Err(_) => CardRef::Address(arg.to_string()),
        }
    }

    fn resolve(&self, view: &AppViewModel) -> Result<String, CommandError> {
        let card = match self {
            CardRef::Index(index) => view.cards.iter().find(|card| card.index == *index),
            CardRef::Address(address) => view.cards.iter().find(|card| &card.url == address),
        };
        card.map(|card| card.url.clone())
            .ok_or_else(|| CommandError::UnknownCard(self.to_string()))
    }
}

impl std::fmt::Display for CardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardRef::Index(index) => write!(f, "#{index}"),
            CardRef::Address(address) => f.write_str(address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(CardRef),
    Mute(CardRef),
    Clear,
    Play,
    Pause,
    MuteAll,
    UnmuteAll,
    Grid(usize),
    Export,
    /// `None` stands for a cancelled file pick.
    Import(Option<PathBuf>),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0} needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("Grid columns must be a positive number, got {0:?}")]
    InvalidColumns(String),
    #[error("No stream {0}")]
    UnknownCard(String),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "add" | "a" => Command::Add(rest.to_string()),
        "remove" | "rm" => Command::Remove(CardRef::parse(required(rest, "remove", "a card")?)),
        "mute" | "m" => Command::Mute(CardRef::parse(required(rest, "mute", "a card")?)),
        "clear" => Command::Clear,
        "play" => Command::Play,
        "pause" => Command::Pause,
        "mute-all" => Command::MuteAll,
        "unmute-all" => Command::UnmuteAll,
        "grid" => {
            let arg = required(rest, "grid", "a column count")?;
            match arg.parse::<usize>() {
                Ok(columns) if columns > 0 => Command::Grid(columns),
                _ => return Err(CommandError::InvalidColumns(arg.to_string())),
            }
        }
        "export" => Command::Export,
        "import" => Command::Import((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Add(line.to_string()),
    };
    Ok(command)
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command, what))
    } else {
        Ok(rest)
    }
}

impl Command {
    /// Translates the command into the messages the user action would send.
    /// Help and quit are handled by the caller and map to nothing.
    pub fn to_msgs(self, view: &AppViewModel) -> Result<Vec<Msg>, CommandError> {
        let msgs = match self {
            Command::Add(address) => vec![Msg::InputChanged(address), Msg::AddSubmitted],
            Command::Remove(card) => vec![Msg::RemoveClicked(card.resolve(view)?)],
            Command::Mute(card) => vec![Msg::ToggleMuteClicked(card.resolve(view)?)],
            Command::Clear => vec![Msg::ClearAllClicked],
            Command::Play => vec![Msg::PlayAllClicked],
            Command::Pause => vec![Msg::PauseAllClicked],
            Command::MuteAll => vec![Msg::MuteAllClicked],
            Command::UnmuteAll => vec![Msg::UnmuteAllClicked],
            Command::Grid(columns) => vec![Msg::GridColumnsChanged(columns)],
            Command::Export => vec![Msg::ExportClicked],
            Command::Import(path) => vec![Msg::ImportFileSelected(path)],
            Command::Help | Command::Quit => Vec::new(),
        };
        Ok(msgs)
    }
}
