use tracing::warn;

use crate::{
    commands::{CommandError, CommandHandler},
    state::State,
};

pub struct ExecArguments;

impl ExecArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("exec".to_string()));
        }

        Ok(Self)
    }
}

/// Closes the client's transaction and hands back the queued commands for execution.
///
/// # Returns
///
/// * `Ok(Vec<CommandHandler>)` - The queued commands, possibly none
/// * `Err(CommandError::ExecWithoutMulti)` - If no transaction is open
/// * `Err(CommandError::TransactionAborted)` - If a queued command failed validation;
///   the transaction is discarded
pub fn exec(
    client_id: u64,
    state: &mut State,
    arguments: Vec<String>,
) -> Result<Vec<CommandHandler>, CommandError> {
    ExecArguments::parse(arguments)?;

    let Some(transaction) = state.take_transaction(client_id) else {
        return Err(CommandError::ExecWithoutMulti);
    };

    if transaction.dirty {
        warn!(client_id, "transaction aborted after a queuing error");
        return Err(CommandError::TransactionAborted);
    }

    Ok(transaction.commands)
}
