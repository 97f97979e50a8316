use crate::commands::executable::Executable;
use crate::commands::{CommandError, CommandParser};
use crate::response::Response;
use crate::store::{Entry, Store};

/// Set `key` to hold `value`, overwriting whatever was there. The stored type is inferred from
/// the text of `value`.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: String,
}

impl Executable for Set {
    fn exec(self, store: &mut Store) -> Result<Response, CommandError> {
        store.set(self.key, infer(self.value));
        Ok(Response::ok())
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = CommandError;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        let key = parser.next_string()?;
        let value = parser.next_string()?;

        Ok(Self { key, value })
    }
}

/// The first parse that succeeds picks the type: integer, then double, then the `true`/`false`
/// literals, then plain string. The order matters, `"5"` is a valid double too. Numbers keep
/// their original text.
pub fn infer(value: String) -> Entry {
    if let Ok(i) = value.parse::<i64>() {
        return Entry::Integer { value: i, raw: value };
    }
    if let Ok(d) = value.parse::<f64>() {
        return Entry::Double { value: d, raw: value };
    }
    match value.as_str() {
        "true" => Entry::Boolean(true),
        "false" => Entry::Boolean(false),
        _ => Entry::String(value),
    }
}
