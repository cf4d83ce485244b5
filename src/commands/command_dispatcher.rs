use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::{
    commands::{
        transactions::{discard, exec, multi},
        CommandError, CommandHandler,
    },
    engine::Engine,
    reply::Reply,
};

/// A caller's view of the engine with its own MULTI/EXEC/DISCARD state.
///
/// Outside a transaction commands run immediately. After `MULTI` they are
/// validated and queued until `EXEC` runs them atomically or `DISCARD`
/// drops them.
pub struct Session {
    id: u64,
    engine: Engine,
}

impl Session {
    pub(crate) fn new(id: u64, engine: Engine) -> Self {
        Session { id, engine }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Dispatches a command, handling transactional and non-transactional flows.
    ///
    /// # Transactional Behavior
    ///
    /// - `MULTI`: Starts a new transaction and replies `OK`
    /// - `EXEC`: Executes all queued commands and replies with an array of their results
    /// - `DISCARD`: Drops the transaction and replies `OK`
    /// - Other commands: Replies `QUEUED` if inside a transaction, executed immediately otherwise
    ///
    /// A command that fails validation while queuing is reported right away and
    /// makes the following `EXEC` fail with `TransactionAborted`.
    pub async fn execute<I, S>(&self, name: &str, arguments: I) -> Result<Reply, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let command = CommandHandler::new(
            name,
            arguments.into_iter().map(|argument| argument.to_string()).collect(),
        );

        match command.name.as_str() {
            "MULTI" => {
                let mut state_guard = self.engine.state().lock().await;
                multi(self.id, &mut state_guard, command.arguments)
            }
            "EXEC" => {
                let queued = {
                    let mut state_guard = self.engine.state().lock().await;
                    exec(self.id, &mut state_guard, command.arguments)?
                };

                debug!(session = self.id, commands = queued.len(), "executing transaction");

                let results = self.engine.transaction(queued).await?;

                Ok(Reply::Array(
                    results
                        .into_iter()
                        .map(|result| result.unwrap_or_else(|error| Reply::Error(error.as_string())))
                        .collect(),
                ))
            }
            "DISCARD" => {
                let mut state_guard = self.engine.state().lock().await;
                discard(self.id, &mut state_guard, command.arguments)
            }
            _ => {
                let mut state_guard = self.engine.state().lock().await;

                if !state_guard.has_transaction(self.id) {
                    drop(state_guard);
                    return self.engine.dispatch(command, true).await;
                }

                if let Err(error) = command.validate_command_arguments() {
                    state_guard.mark_transaction_dirty(self.id);
                    return Err(error);
                }

                state_guard.add_to_transaction(self.id, command)?;

                Ok(Reply::SimpleString("QUEUED".to_string()))
            }
        }
    }
}

impl Drop for Session {
    /// Discards a transaction left open by the session. It is never executed.
    fn drop(&mut self) {
        let cleared = match self.engine.state().try_lock() {
            Ok(mut state_guard) => {
                state_guard.take_transaction(self.id);
                true
            }
            Err(_) => false,
        };

        if cleared {
            return;
        }

        // The state is busy: clear it once the current holder lets go.
        if let Ok(handle) = Handle::try_current() {
            let state = Arc::clone(self.engine.state());
            let id = self.id;

            handle.spawn(async move {
                state.lock().await.take_transaction(id);
            });
        } else {
            warn!(session = self.id, "no Tokio runtime available, queued transaction left behind");
        }
    }
}
