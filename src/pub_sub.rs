use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, info, warn};

/// A message delivered to a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub channel: String,
    pub payload: String,
}

type Channels = HashMap<String, HashMap<u64, mpsc::UnboundedSender<Message>>>;

/// Channel registry and message fan-out.
///
/// A channel only exists while at least one subscriber is registered on it.
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PubSub {
    channels: Arc<RwLock<Channels>>,
    next_subscriber_id: Arc<AtomicU64>,
}

impl PubSub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber on every channel in `channels`.
    ///
    /// Messages published after this call returns are queued on the returned
    /// [`Subscription`] until it is listened to or dropped.
    pub async fn subscribe(&self, channels: &[String]) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut unique_channels: Vec<String> = Vec::with_capacity(channels.len());
        for channel in channels {
            if !unique_channels.contains(channel) {
                unique_channels.push(channel.clone());
            }
        }

        let mut channels_guard = self.channels.write().await;
        for channel in &unique_channels {
            channels_guard
                .entry(channel.clone())
                .or_default()
                .insert(id, sender.clone());
        }
        drop(channels_guard);

        info!(subscriber = id, channels = ?unique_channels, "subscribed");

        Subscription {
            id,
            channels: unique_channels,
            receiver,
            pub_sub: self.clone(),
        }
    }

    /// Sends `payload` to every subscriber of `channel` and returns how many
    /// received it.
    ///
    /// Subscribers whose receiving side is gone are dropped from the registry.
    pub async fn publish(&self, channel: &str, payload: &str) -> usize {
        let mut channels_guard = self.channels.write().await;

        let Some(subscribers) = channels_guard.get_mut(channel) else {
            return 0;
        };

        let message = Message {
            channel: channel.to_string(),
            payload: payload.to_string(),
        };

        let mut delivered = 0;
        subscribers.retain(|id, sender| match sender.send(message.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => {
                warn!(subscriber = id, channel, "dropping closed subscriber");
                false
            }
        });

        if subscribers.is_empty() {
            channels_guard.remove(channel);
        }

        debug!(channel, receivers = delivered, "published");
        delivered
    }

    /// Number of subscribers currently registered on `channel`.
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    async fn unsubscribe(&self, id: u64, channels: &[String]) {
        let mut channels_guard = self.channels.write().await;

        for channel in channels {
            if let Some(subscribers) = channels_guard.get_mut(channel) {
                subscribers.remove(&id);
                if subscribers.is_empty() {
                    channels_guard.remove(channel);
                }
            }
        }

        info!(subscriber = id, "unsubscribed");
    }
}

/// A registered subscriber. Unregisters itself when [`Subscription::listen`] returns.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    channels: Vec<String>,
    receiver: mpsc::UnboundedReceiver<Message>,
    pub_sub: PubSub,
}

impl Subscription {
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Waits for the next message on any subscribed channel.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// Calls `handler` for every message until `shutdown` turns true, then
    /// unregisters from all channels.
    pub async fn listen<F>(mut self, mut handler: F, mut shutdown: watch::Receiver<bool>)
    where
        F: FnMut(Message),
    {
        if !*shutdown.borrow() {
            loop {
                tokio::select! {
                    message = self.receiver.recv() => match message {
                        Some(message) => handler(message),
                        None => break,
                    },
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        }

        self.pub_sub.unsubscribe(self.id, &self.channels).await;
    }
}
