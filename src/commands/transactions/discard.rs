use crate::{commands::CommandError, reply::Reply, state::State};

pub struct DiscardArguments;

impl DiscardArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("discard".to_string()));
        }

        Ok(Self)
    }
}

pub fn discard(client_id: u64, state: &mut State, arguments: Vec<String>) -> Result<Reply, CommandError> {
    DiscardArguments::parse(arguments)?;

    let Some(_) = state.take_transaction(client_id) else {
        return Err(CommandError::DiscardWithoutMulti);
    };

    Ok(Reply::Ok)
}
