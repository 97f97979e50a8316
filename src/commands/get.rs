use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::response::Response;
use crate::store::Store;

/// Get the value of `key`, re-typed as it was inferred when it was stored. If the key does not
/// exist the null value is returned.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: &mut Store) -> Result<Response, CommandError> {
        Ok(Response::from(store.get(&self.key)))
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        Ok(Self { key })
    }
}
