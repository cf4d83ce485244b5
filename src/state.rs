use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::commands::{CommandError, CommandHandler};

/// A reader blocked until an entry is appended to one of its streams.
#[derive(Debug)]
pub struct StreamWaiter {
    pub client_id: u64,
    pub sender: mpsc::Sender<()>,
}

/// Commands queued between MULTI and EXEC.
#[derive(Debug, Default)]
pub struct QueuedTransaction {
    pub commands: Vec<CommandHandler>,
    /// Set when a queued command failed validation; EXEC then aborts.
    pub dirty: bool,
}

#[derive(Debug, Default)]
pub struct State {
    transactions: HashMap<u64, QueuedTransaction>,
    stream_waiters: HashMap<String, Vec<StreamWaiter>>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_transaction(&mut self, client_id: u64) -> Result<(), CommandError> {
        if self.transactions.contains_key(&client_id) {
            return Err(CommandError::NestedMulti);
        }

        self.transactions
            .insert(client_id, QueuedTransaction::default());
        Ok(())
    }

    pub fn has_transaction(&self, client_id: u64) -> bool {
        self.transactions.contains_key(&client_id)
    }

    pub fn add_to_transaction(
        &mut self,
        client_id: u64,
        command: CommandHandler,
    ) -> Result<(), CommandError> {
        let Some(transaction) = self.transactions.get_mut(&client_id) else {
            return Err(CommandError::ExecWithoutMulti);
        };

        transaction.commands.push(command);
        Ok(())
    }

    pub fn mark_transaction_dirty(&mut self, client_id: u64) {
        if let Some(transaction) = self.transactions.get_mut(&client_id) {
            transaction.dirty = true;
        }
    }

    /// Removes and returns the client's queued transaction.
    pub fn take_transaction(&mut self, client_id: u64) -> Option<QueuedTransaction> {
        self.transactions.remove(&client_id)
    }

    pub fn add_stream_waiter(&mut self, key: &str, waiter: StreamWaiter) {
        self.stream_waiters
            .entry(key.to_string())
            .or_default()
            .push(waiter);
    }

    pub fn remove_stream_waiter(&mut self, key: &str, client_id: u64) {
        if let Some(waiters) = self.stream_waiters.get_mut(key) {
            waiters.retain(|waiter| waiter.client_id != client_id);
            if waiters.is_empty() {
                self.stream_waiters.remove(key);
            }
        }
    }

    /// Wakes every reader blocked on `key` and returns how many were woken.
    pub fn notify_stream(&mut self, key: &str) -> usize {
        let Some(waiters) = self.stream_waiters.get(key) else {
            return 0;
        };

        waiters
            .iter()
            .filter(|waiter| waiter.sender.try_send(()).is_ok())
            .count()
    }

    pub fn stream_waiter_count(&self, key: &str) -> usize {
        self.stream_waiters
            .get(key)
            .map(|waiters| waiters.len())
            .unwrap_or(0)
    }
}
