use std::collections::{BTreeMap, BTreeSet};

use super::stream_id::StreamId;

/// Delivery bookkeeping for one unacknowledged entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub consumer: String,
    pub delivery_count: u64,
    pub last_delivered_ms: u64,
}

/// A named cursor over a stream shared by several consumers.
///
/// Every ID in `pending` is also in its owner's set in `consumers`, and the
/// reverse holds too.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerGroup {
    pub name: String,
    pub last_delivered_id: StreamId,
    consumers: BTreeMap<String, BTreeSet<StreamId>>,
    pending: BTreeMap<StreamId, PendingEntry>,
}

impl ConsumerGroup {
    pub fn new(name: &str, last_delivered_id: StreamId) -> Self {
        Self {
            name: name.to_string(),
            last_delivered_id,
            consumers: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Registers a consumer with an empty pending set. Returns `false` if it existed.
    pub fn create_consumer(&mut self, consumer: &str) -> bool {
        if self.consumers.contains_key(consumer) {
            return false;
        }

        self.consumers.insert(consumer.to_string(), BTreeSet::new());
        true
    }

    /// Removes a consumer and its pending entries, returning how many it held.
    pub fn delete_consumer(&mut self, consumer: &str) -> usize {
        let Some(ids) = self.consumers.remove(consumer) else {
            return 0;
        };

        for id in &ids {
            self.pending.remove(id);
        }

        ids.len()
    }

    pub fn has_consumer(&self, consumer: &str) -> bool {
        self.consumers.contains_key(consumer)
    }

    /// Records that `id` was handed to `consumer` and advances the group cursor.
    pub fn deliver(&mut self, consumer: &str, id: StreamId, now_ms: u64, track_pending: bool) {
        if id > self.last_delivered_id {
            self.last_delivered_id = id;
        }

        self.create_consumer(consumer);

        if !track_pending {
            return;
        }

        if let Some(previous) = self.pending.get(&id) {
            let previous_owner = previous.consumer.clone();
            if let Some(ids) = self.consumers.get_mut(&previous_owner) {
                ids.remove(&id);
            }
        }

        let delivery_count = self
            .pending
            .get(&id)
            .map(|entry| entry.delivery_count + 1)
            .unwrap_or(1);

        self.pending.insert(
            id,
            PendingEntry {
                consumer: consumer.to_string(),
                delivery_count,
                last_delivered_ms: now_ms,
            },
        );

        if let Some(ids) = self.consumers.get_mut(consumer) {
            ids.insert(id);
        }
    }

    /// Acknowledges an entry. Returns `true` if it was pending.
    pub fn acknowledge(&mut self, id: &StreamId) -> bool {
        let Some(entry) = self.pending.remove(id) else {
            return false;
        };

        if let Some(ids) = self.consumers.get_mut(&entry.consumer) {
            ids.remove(id);
        }

        true
    }

    /// The consumer's pending IDs strictly after `after`.
    pub fn pending_for(&self, consumer: &str, after: StreamId) -> Vec<StreamId> {
        self.consumers
            .get(consumer)
            .map(|ids| {
                ids.iter()
                    .filter(|id| **id > after)
                    .copied()
                    .collect::<Vec<StreamId>>()
            })
            .unwrap_or_default()
    }

    pub fn pending_entry(&self, id: &StreamId) -> Option<&PendingEntry> {
        self.pending.get(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_range(&self) -> Option<(StreamId, StreamId)> {
        let first = self.pending.keys().next()?;
        let last = self.pending.keys().next_back()?;
        Some((*first, *last))
    }

    /// Per-consumer pending counts, skipping consumers with nothing pending.
    pub fn pending_per_consumer(&self) -> Vec<(String, usize)> {
        self.consumers
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(name, ids)| (name.clone(), ids.len()))
            .collect()
    }
}
