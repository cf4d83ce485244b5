use crate::{commands::CommandError, reply::Reply, state::State};

pub struct MultiArguments;

impl MultiArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("multi".to_string()));
        }

        Ok(Self)
    }
}

/// Starts queuing commands for `client_id`. Fails with `NestedMulti` if a
/// transaction is already open.
pub fn multi(client_id: u64, state: &mut State, arguments: Vec<String>) -> Result<Reply, CommandError> {
    MultiArguments::parse(arguments)?;

    state.start_transaction(client_id)?;

    Ok(Reply::Ok)
}
