use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::response::Response;
use crate::store::Store;

/// Returns PONG if no argument is provided, otherwise return a copy of the argument as a bulk.
///
/// Ref: <https://redis.io/docs/latest/commands/ping>
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub payload: Option<String>,
}

impl Executable for Ping {
    fn exec(self, _store: &mut Store) -> Result<Response, CommandError> {
        let res = self.payload.map_or_else(
            || Response::Simple("PONG".to_string()),
            |payload| Response::Bulk(Bytes::from(payload)),
        );

        Ok(res)
    }
}

impl TryFrom<&mut CommandParser> for Ping {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let payload = parser.next_optional();
        parser.finish()?;

        Ok(Self { payload })
    }
}
