use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::{
    runtime::Handle,
    sync::{mpsc, watch, Mutex, RwLock},
    time::{timeout_at, Instant},
};
use tracing::{debug, info, warn};

use crate::{
    clock::{Clock, SystemClock},
    commands::{publish, resolve_last_ids, BlockingRequest, CommandError, CommandHandler, Session},
    config::EngineConfig,
    expiry::ExpiryManager,
    key_value_store::KeyValueStore,
    pub_sub::{Message, PubSub},
    reply::Reply,
    state::{State, StreamWaiter},
};

/// Outcome of every command in a batch, in submission order.
pub type BatchResults = Vec<Result<Reply, CommandError>>;

/// The shared data engine.
///
/// Clones are cheap and all refer to the same keyspace, sessions and
/// channels. Commands are addressed by name with string arguments:
///
/// ```ignore
/// let engine = Engine::new(EngineConfig::default());
/// engine.execute("RPUSH", ["queue", "a", "b"]).await?;
/// let first = engine.execute("LPOP", ["queue"]).await?;
/// ```
#[derive(Clone)]
pub struct Engine {
    store: Arc<RwLock<KeyValueStore>>,
    state: Arc<Mutex<State>>,
    pub_sub: PubSub,
    config: Arc<EngineConfig>,
    shutdown: Arc<watch::Sender<bool>>,
    next_client_id: Arc<AtomicU64>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds an engine reading time from `clock`.
    ///
    /// The active expiry task is only started when called inside a Tokio
    /// runtime; lazy expiry works either way.
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(RwLock::new(KeyValueStore::new(clock, config.strict_types)));
        let (shutdown, shutdown_receiver) = watch::channel(false);

        if Handle::try_current().is_ok() {
            ExpiryManager::spawn_active_expiry(
                Arc::clone(&store),
                config.expiry_interval(),
                config.expiry_budget,
                shutdown_receiver,
            );
        } else {
            warn!("no Tokio runtime available, active expiry not started");
        }

        info!(
            strict_types = config.strict_types,
            expiry_interval_ms = config.expiry_interval_ms,
            max_block_ms = config.max_block_ms,
            "engine started"
        );

        Self {
            store,
            state: Arc::new(Mutex::new(State::new())),
            pub_sub: PubSub::new(),
            config: Arc::new(config),
            shutdown: Arc::new(shutdown),
            next_client_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pub_sub(&self) -> &PubSub {
        &self.pub_sub
    }

    /// A receiver that turns true once [`Engine::shutdown`] is called.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Stops the expiry task and releases every blocked reader and subscriber.
    pub fn shutdown(&self) {
        if !self.shutdown.send_replace(true) {
            info!("engine shutting down");
        }
    }

    /// Opens a session able to run MULTI/EXEC/DISCARD.
    pub fn session(&self) -> Session {
        Session::new(self.next_client_id(), self.clone())
    }

    /// Executes a single command.
    ///
    /// XREAD and XREADGROUP with a BLOCK option suspend until data arrives,
    /// the block time elapses or the engine shuts down. MULTI, EXEC and
    /// DISCARD need a [`Session`].
    pub async fn execute<I, S>(&self, name: &str, arguments: I) -> Result<Reply, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let command = CommandHandler::new(
            name,
            arguments.into_iter().map(|argument| argument.to_string()).collect(),
        );

        self.dispatch(command, true).await
    }

    /// Runs `commands` in order, each on its own. A failing command does not
    /// stop the ones after it and BLOCK options are ignored.
    pub async fn pipeline(&self, commands: Vec<CommandHandler>) -> BatchResults {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            results.push(self.dispatch(command, false).await);
        }

        results
    }

    /// Runs `commands` atomically.
    ///
    /// Every command is validated first; one invalid command aborts the whole
    /// batch with `TransactionAborted` before anything runs. Otherwise all of
    /// them execute under one exclusive lock and each reports its own result.
    pub async fn transaction(&self, commands: Vec<CommandHandler>) -> Result<BatchResults, CommandError> {
        for command in &commands {
            if let Err(error) = command.validate_command_arguments() {
                warn!(command = %command.name, error = %error, "transaction aborted");
                return Err(CommandError::TransactionAborted);
            }
        }

        let mut store = self.store.write().await;
        let mut results = Vec::with_capacity(commands.len());
        let mut appended_streams = Vec::new();

        for command in &commands {
            debug!(command = %command.name, "executing in transaction");

            let result = if command.is_publish() {
                publish(&self.pub_sub, command.arguments.clone()).await
            } else {
                command.handle_write(&mut store)
            };

            if result.is_ok() {
                if let Some(key) = command.appended_stream() {
                    appended_streams.push(key.to_string());
                }
            }

            results.push(result);
        }

        if !appended_streams.is_empty() {
            let mut state = self.state.lock().await;
            for key in &appended_streams {
                state.notify_stream(key);
            }
        }

        Ok(results)
    }

    /// Publishes `message` on `channel` and returns the number of receivers.
    pub async fn publish(&self, channel: &str, message: &str) -> usize {
        self.pub_sub.publish(channel, message).await
    }

    /// Calls `handler` for every message published on `channels` until the
    /// engine shuts down.
    pub async fn subscribe<F>(&self, channels: &[String], handler: F)
    where
        F: FnMut(Message),
    {
        let subscription = self.pub_sub.subscribe(channels).await;
        subscription.listen(handler, self.shutdown_signal()).await;
    }

    pub(crate) fn state(&self) -> &Arc<Mutex<State>> {
        &self.state
    }

    pub(crate) fn next_client_id(&self) -> u64 {
        self.next_client_id.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) async fn dispatch(
        &self,
        command: CommandHandler,
        allow_blocking: bool,
    ) -> Result<Reply, CommandError> {
        debug!(command = %command.name, arguments = command.arguments.len(), "executing");

        if command.is_publish() {
            return publish(&self.pub_sub, command.arguments).await;
        }

        if allow_blocking {
            if let Some(request) = command.blocking_request() {
                return self.execute_blocking(command, request).await;
            }
        }

        if command.is_read_only() {
            let store = self.store.read().await;
            return command.handle_read(&store);
        }

        let mut store = self.store.write().await;
        let result = command.handle_write(&mut store);

        if result.is_ok() {
            if let Some(key) = command.appended_stream() {
                let woken = self.state.lock().await.notify_stream(key);
                if woken > 0 {
                    debug!(key, woken, "woke blocked stream readers");
                }
            }
        }

        result
    }

    async fn execute_blocking(
        &self,
        mut command: CommandHandler,
        request: BlockingRequest,
    ) -> Result<Reply, CommandError> {
        let client_id = self.next_client_id();
        let deadline = Instant::now() + self.config.block_duration(request.block_ms);
        let mut shutdown = self.shutdown_signal();

        if command.name == "XREAD" {
            let store = self.store.read().await;
            command.arguments = resolve_last_ids(&store, command.arguments)?;
        }

        loop {
            let (sender, mut receiver) = mpsc::channel(1);

            // Waiters are registered before the store lock is released so no XADD can slip in between.
            if command.is_read_only() {
                let store = self.store.read().await;
                let reply = command.handle_read(&store)?;
                if !reply.is_null() {
                    return Ok(reply);
                }
                self.add_stream_waiters(&request.keys, client_id, &sender).await;
            } else {
                let mut store = self.store.write().await;
                let reply = command.handle_write(&mut store)?;
                if !reply.is_null() {
                    return Ok(reply);
                }
                self.add_stream_waiters(&request.keys, client_id, &sender).await;
            }
            drop(sender);

            debug!(client_id, keys = ?request.keys, "blocked on streams");

            let woken = tokio::select! {
                received = timeout_at(deadline, receiver.recv()) => matches!(received, Ok(Some(()))),
                _ = wait_for_shutdown(&mut shutdown) => false,
            };

            let mut state = self.state.lock().await;
            for key in &request.keys {
                state.remove_stream_waiter(key, client_id);
            }
            drop(state);

            if !woken {
                debug!(client_id, "blocked read finished without data");
                return Ok(Reply::Null);
            }
        }
    }

    async fn add_stream_waiters(&self, keys: &[String], client_id: u64, sender: &mpsc::Sender<()>) {
        let mut state = self.state.lock().await;
        for key in keys {
            state.add_stream_waiter(
                key,
                StreamWaiter {
                    client_id,
                    sender: sender.clone(),
                },
            );
        }
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
