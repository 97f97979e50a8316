use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::response::Response;
use crate::store::Store;

// https://redis.io/commands/del
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<String>,
}

impl Executable for Del {
    fn exec(self, store: &mut Store) -> Result<Response, CommandError> {
        let mut count = 0;
        for key in self.keys {
            if store.remove(&key).is_some() {
                count += 1;
            }
        }
        Ok(Response::integer(count))
    }
}

impl TryFrom<&mut CommandParser> for Del {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let mut keys = vec![parser.next_string()?];
        keys.extend(parser.remaining());

        Ok(Self { keys })
    }
}
