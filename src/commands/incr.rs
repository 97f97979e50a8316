use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::response::Response;
use crate::store::{Entry, Store};

/// Increments the integer stored at key by one. A missing key starts from zero. The new value is
/// not returned, a following `GET` reads it.
///
/// Ref: <https://redis.io/docs/latest/commands/incr/>
#[derive(Debug, PartialEq)]
pub struct Incr {
    pub key: String,
}

impl Executable for Incr {
    fn exec(self, store: &mut Store) -> Result<Response, CommandError> {
        let value = match store.get(&self.key) {
            Entry::Null => 1,
            // Overflow wraps like a machine integer.
            Entry::Integer { value, .. } => value.wrapping_add(1),
            _ => return Err(CommandError::WrongType),
        };

        store.set(self.key, Entry::integer(value));

        Ok(Response::ok())
    }
}

impl TryFrom<&mut CommandParser> for Incr {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        parser.finish()?;

        Ok(Self { key })
    }
}
