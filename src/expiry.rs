use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{watch, RwLock},
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::key_value_store::KeyValueStore;

/// Proactive removal of expired keys.
///
/// Lazy expiry already hides expired keys from every read; sweeping only
/// reclaims the memory of keys nobody touches again.
pub struct ExpiryManager;

impl ExpiryManager {
    /// Removes up to `budget` expired keys and returns how many were removed.
    pub fn sweep(store: &mut KeyValueStore, budget: usize) -> usize {
        let expired = store.expired_keys(budget);

        expired
            .iter()
            .filter(|key| store.evict(key))
            .count()
    }

    /// Runs [`ExpiryManager::sweep`] on every tick until `shutdown` turns true.
    ///
    /// Returns `None` without spawning anything when `every` is zero.
    pub fn spawn_active_expiry(
        store: Arc<RwLock<KeyValueStore>>,
        every: Duration,
        budget: usize,
        mut shutdown: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        if every.is_zero() {
            info!("active expiry disabled");
            return None;
        }

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let mut store_guard = store.write().await;
                        let evicted = ExpiryManager::sweep(&mut store_guard, budget);
                        drop(store_guard);

                        if evicted > 0 {
                            debug!(evicted, "expired keys evicted");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("active expiry stopped");
        });

        Some(handle)
    }
}
