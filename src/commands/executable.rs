use crate::commands::CommandError;
use crate::response::Response;
use crate::store::Store;

pub trait Executable {
    fn exec(self, store: &mut Store) -> Result<Response, CommandError>;
}
