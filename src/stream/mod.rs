//! Append-only streams with consumer groups.

pub mod consumer_group;
pub mod stream_id;

use std::collections::{BTreeMap, HashMap};

pub use consumer_group::{ConsumerGroup, PendingEntry};
pub use stream_id::{IdRequest, StreamId};

use crate::commands::CommandError;

/// Field/value pairs of one entry, in the order they were given.
pub type StreamFields = Vec<(String, String)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stream {
    entries: BTreeMap<StreamId, StreamFields>,
    /// Greatest ID ever appended; `None` until the first XADD.
    last_id: Option<StreamId>,
    groups: HashMap<String, ConsumerGroup>,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_id(&self) -> StreamId {
        self.last_id.unwrap_or(StreamId::MIN)
    }

    /// Appends an entry and returns its ID. Entries are never reordered.
    pub fn append(
        &mut self,
        request: IdRequest,
        fields: StreamFields,
        now_ms: u64,
    ) -> Result<StreamId, CommandError> {
        let id = request.resolve(self.last_id, now_ms)?;

        self.entries.insert(id, fields);
        self.last_id = Some(id);

        Ok(id)
    }

    /// Entries with `start <= id <= end`, at most `count` of them.
    pub fn range(
        &self,
        start: StreamId,
        end: StreamId,
        count: Option<usize>,
    ) -> Vec<(StreamId, &StreamFields)> {
        if start > end {
            return Vec::new();
        }

        self.entries
            .range(start..=end)
            .take(count.unwrap_or(usize::MAX))
            .map(|(id, fields)| (*id, fields))
            .collect()
    }

    /// Entries strictly after `after`, at most `count` of them.
    pub fn entries_after(
        &self,
        after: StreamId,
        count: Option<usize>,
    ) -> Vec<(StreamId, &StreamFields)> {
        match after.successor() {
            Some(start) => self.range(start, StreamId::MAX, count),
            None => Vec::new(),
        }
    }

    pub fn create_group(&mut self, name: &str, start: StreamId) -> Result<(), CommandError> {
        if self.groups.contains_key(name) {
            return Err(CommandError::GroupAlreadyExists);
        }

        self.groups
            .insert(name.to_string(), ConsumerGroup::new(name, start));
        Ok(())
    }

    pub fn destroy_group(&mut self, name: &str) -> bool {
        self.groups.remove(name).is_some()
    }

    pub fn group(&self, name: &str) -> Option<&ConsumerGroup> {
        self.groups.get(name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut ConsumerGroup> {
        self.groups.get_mut(name)
    }

    /// Hands up to `count` undelivered entries to `consumer`.
    ///
    /// Entries after the group cursor are returned in ID order; the cursor
    /// advances past them and, unless `noack`, they enter the consumer's
    /// pending set. Returns `None` if the group does not exist.
    pub fn read_group_new(
        &mut self,
        group: &str,
        consumer: &str,
        count: Option<usize>,
        noack: bool,
        now_ms: u64,
    ) -> Option<Vec<(StreamId, StreamFields)>> {
        let cursor = self.groups.get(group)?.last_delivered_id;

        let delivered = self
            .entries_after(cursor, count)
            .into_iter()
            .map(|(id, fields)| (id, fields.clone()))
            .collect::<Vec<(StreamId, StreamFields)>>();

        let group = self.groups.get_mut(group)?;
        group.create_consumer(consumer);

        for (id, _) in &delivered {
            group.deliver(consumer, *id, now_ms, !noack);
        }

        Some(delivered)
    }

    /// Re-reads the consumer's own pending entries after `after`.
    ///
    /// Pending IDs whose entry no longer exists are reported with no fields.
    /// Returns `None` if the group does not exist.
    pub fn read_group_pending(
        &mut self,
        group: &str,
        consumer: &str,
        after: StreamId,
        count: Option<usize>,
    ) -> Option<Vec<(StreamId, Option<StreamFields>)>> {
        let group = self.groups.get_mut(group)?;
        group.create_consumer(consumer);

        let ids = group.pending_for(consumer, after);

        Some(
            ids.into_iter()
                .take(count.unwrap_or(usize::MAX))
                .map(|id| (id, self.entries.get(&id).cloned()))
                .collect(),
        )
    }
}
