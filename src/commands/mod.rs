pub mod del;
pub mod executable;
pub mod get;
pub mod incr;
pub mod ping;
pub mod set;

use std::vec;
use strum_macros::{Display, EnumString};
use thiserror::Error as ThisError;

use crate::commands::executable::Executable;
use crate::frame::Request;
use crate::response::Response;
use crate::store::Store;

use del::Del;
use get::Get;
use incr::Incr;
use ping::Ping;
use set::Set;

/// Every verb the server understands. Parsing a verb is ASCII case-insensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CommandKind {
    Get,
    Set,
    Incr,
    Del,
    Ping,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Get(Get),
    Set(Set),
    Incr(Incr),
    Del(Del),
    Ping(Ping),
}

impl Executable for Command {
    fn exec(self, store: &mut Store) -> Result<Response, CommandError> {
        match self {
            Command::Get(cmd) => cmd.exec(store),
            Command::Set(cmd) => cmd.exec(store),
            Command::Incr(cmd) => cmd.exec(store),
            Command::Del(cmd) => cmd.exec(store),
            Command::Ping(cmd) => cmd.exec(store),
        }
    }
}

impl TryFrom<Request> for Command {
    type Error = CommandError;

    fn try_from(request: Request) -> Result<Self, Self::Error> {
        let parser = &mut CommandParser {
            command: request.command,
            parts: request.args.into_iter(),
        };

        match request.command {
            CommandKind::Get => Get::try_from(parser).map(Command::Get),
            CommandKind::Set => Set::try_from(parser).map(Command::Set),
            CommandKind::Incr => Incr::try_from(parser).map(Command::Incr),
            CommandKind::Del => Del::try_from(parser).map(Command::Del),
            CommandKind::Ping => Ping::try_from(parser).map(Command::Ping),
        }
    }
}

/// Hands out a request's arguments one by one. Running out of arguments is an arity error for
/// the command being parsed.
pub(crate) struct CommandParser {
    command: CommandKind,
    parts: vec::IntoIter<String>,
}

impl CommandParser {
    fn next_string(&mut self) -> Result<String, CommandError> {
        self.parts.next().ok_or(CommandError::Arity {
            command: self.command,
        })
    }

    fn next_optional(&mut self) -> Option<String> {
        self.parts.next()
    }

    fn remaining(&mut self) -> Vec<String> {
        self.parts.by_ref().collect()
    }

    /// Fails if any argument is left.
    fn finish(&mut self) -> Result<(), CommandError> {
        match self.parts.next() {
            Some(_) => Err(CommandError::Arity {
                command: self.command,
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum CommandError {
    #[error("wrong number of arguments for '{command}' command")]
    Arity { command: CommandKind },
    #[error("WRONGTYPE existing value for key is not an integer")]
    WrongType,
}
