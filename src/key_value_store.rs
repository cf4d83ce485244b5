use std::{
    collections::{hash_map::Entry, HashMap, VecDeque},
    sync::Arc,
};

use crate::{
    clock::Clock,
    collections::{hash::HashValue, hyperloglog::HyperLogLog, set::OrderedSet, sorted_set::SortedSet},
    commands::CommandError,
    stream::Stream,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(String),
    List(VecDeque<String>),
    Set(OrderedSet),
    SortedSet(SortedSet),
    Hash(HashValue),
    HyperLogLog(HyperLogLog),
    Stream(Stream),
}

/// The variant tag of a [`DataType`], used to check a key's type before access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    List,
    Set,
    SortedSet,
    Hash,
    HyperLogLog,
    Stream,
}

impl ValueKind {
    /// Name reported by the TYPE command.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::String | ValueKind::HyperLogLog => "string",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::SortedSet => "zset",
            ValueKind::Hash => "hash",
            ValueKind::Stream => "stream",
        }
    }
}

impl DataType {
    pub fn kind(&self) -> ValueKind {
        match self {
            DataType::String(_) => ValueKind::String,
            DataType::List(_) => ValueKind::List,
            DataType::Set(_) => ValueKind::Set,
            DataType::SortedSet(_) => ValueKind::SortedSet,
            DataType::Hash(_) => ValueKind::Hash,
            DataType::HyperLogLog(_) => ValueKind::HyperLogLog,
            DataType::Stream(_) => ValueKind::Stream,
        }
    }

    /// Whether this is a collection with no elements left. Streams are never
    /// considered empty because their groups outlive their entries.
    fn is_empty_collection(&self) -> bool {
        match self {
            DataType::List(list) => list.is_empty(),
            DataType::Set(set) => set.is_empty(),
            DataType::SortedSet(set) => set.is_empty(),
            DataType::Hash(hash) => hash.is_empty(),
            DataType::String(_) | DataType::HyperLogLog(_) | DataType::Stream(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: DataType,
    /// Absolute expiry in unix milliseconds.
    pub expiration: Option<u64>,
}

impl Value {
    pub fn new(data: DataType) -> Self {
        Self {
            data,
            expiration: None,
        }
    }

    fn is_expired(&self, now_ms: u64) -> bool {
        matches!(self.expiration, Some(expiration) if now_ms >= expiration)
    }
}

/// Remaining lifetime of a key as reported by TTL and PTTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    Missing,
    Persistent,
    ExpiresIn(u64),
}

/// Keyed container of typed values with per-key expiry.
///
/// Expired entries are invisible to every read. Mutable accessors remove them
/// on the spot, shared accessors only skip them and leave the removal to the
/// next write or to the active expiry sweep.
#[derive(Debug)]
pub struct KeyValueStore {
    entries: HashMap<String, Value>,
    clock: Arc<dyn Clock>,
    strict_types: bool,
}

impl KeyValueStore {
    pub fn new(clock: Arc<dyn Clock>, strict_types: bool) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            strict_types,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Returns the live value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let now_ms = self.now_ms();
        self.entries
            .get(key)
            .filter(|value| !value.is_expired(now_ms))
    }

    /// Stores `data` under `key`, replacing whatever was there.
    ///
    /// A `ttl_ms` sets the expiry relative to now, `None` leaves the key persistent.
    pub fn set(&mut self, key: &str, data: DataType, ttl_ms: Option<u64>) {
        let expiration = ttl_ms.map(|ttl_ms| self.now_ms().saturating_add(ttl_ms));
        self.entries
            .insert(key.to_string(), Value { data, expiration });
    }

    /// Removes a key, returning `true` if a live value was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let now_ms = self.now_ms();
        match self.entries.remove(key) {
            Some(value) => !value.is_expired(now_ms),
            None => false,
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now_ms = self.now_ms();
        self.entries
            .values()
            .filter(|value| !value.is_expired(now_ms))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        self.get(key).map(|value| value.data.kind())
    }

    /// Looks up `key` expecting a value of `kind`.
    ///
    /// A key holding another kind is reported absent, or rejected with
    /// `WrongTypeForKey` when strict typing is on.
    pub fn read(&self, key: &str, kind: ValueKind) -> Result<Option<&DataType>, CommandError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        if value.data.kind() != kind {
            return self.type_mismatch();
        }

        Ok(Some(&value.data))
    }

    /// Mutable counterpart of [`KeyValueStore::read`].
    pub fn read_mut(
        &mut self,
        key: &str,
        kind: ValueKind,
    ) -> Result<Option<&mut DataType>, CommandError> {
        self.remove_if_expired(key);
        let strict_types = self.strict_types;

        let Some(value) = self.entries.get_mut(key) else {
            return Ok(None);
        };

        if value.data.kind() != kind {
            return if strict_types {
                Err(CommandError::WrongTypeForKey)
            } else {
                Ok(None)
            };
        }

        Ok(Some(&mut value.data))
    }

    /// Returns the value of `kind` under `key`, inserting `create()` when the
    /// key is absent.
    ///
    /// In lenient mode a key holding another kind is replaced by a fresh value
    /// and loses its expiry.
    pub fn write_or_create<F>(
        &mut self,
        key: &str,
        kind: ValueKind,
        create: F,
    ) -> Result<&mut DataType, CommandError>
    where
        F: FnOnce() -> DataType,
    {
        self.remove_if_expired(key);
        let strict_types = self.strict_types;

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();

                if value.data.kind() != kind {
                    if strict_types {
                        return Err(CommandError::WrongTypeForKey);
                    }
                    *value = Value::new(create());
                }

                Ok(&mut value.data)
            }
            Entry::Vacant(entry) => Ok(&mut entry.insert(Value::new(create())).data),
        }
    }

    /// Deletes `key` if it holds a collection with no elements.
    pub fn remove_if_empty(&mut self, key: &str) {
        let is_empty = self
            .entries
            .get(key)
            .map(|value| value.data.is_empty_collection())
            .unwrap_or(false);

        if is_empty {
            self.entries.remove(key);
        }
    }

    /// Sets a key's expiry to `ttl_ms` from now. Returns `false` if the key is missing.
    pub fn expire(&mut self, key: &str, ttl_ms: u64) -> bool {
        self.remove_if_expired(key);
        let expiration = self.now_ms().saturating_add(ttl_ms);

        match self.entries.get_mut(key) {
            Some(value) => {
                value.expiration = Some(expiration);
                true
            }
            None => false,
        }
    }

    /// Clears a key's expiry. Returns `true` only if an expiry was removed.
    pub fn persist(&mut self, key: &str) -> bool {
        self.remove_if_expired(key);

        match self.entries.get_mut(key) {
            Some(value) => value.expiration.take().is_some(),
            None => false,
        }
    }

    pub fn ttl_ms(&self, key: &str) -> KeyTtl {
        let now_ms = self.now_ms();

        match self.get(key) {
            None => KeyTtl::Missing,
            Some(Value {
                expiration: None, ..
            }) => KeyTtl::Persistent,
            Some(Value {
                expiration: Some(expiration),
                ..
            }) => KeyTtl::ExpiresIn(expiration.saturating_sub(now_ms)),
        }
    }

    /// Up to `limit` keys whose expiry has passed.
    pub fn expired_keys(&self, limit: usize) -> Vec<String> {
        let now_ms = self.now_ms();
        self.entries
            .iter()
            .filter(|(_, value)| value.is_expired(now_ms))
            .take(limit)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Drops an entry regardless of its expiry.
    pub fn evict(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn remove_if_expired(&mut self, key: &str) {
        let now_ms = self.now_ms();
        if self
            .entries
            .get(key)
            .is_some_and(|value| value.is_expired(now_ms))
        {
            self.entries.remove(key);
        }
    }

    fn type_mismatch<T>(&self) -> Result<Option<T>, CommandError> {
        if self.strict_types {
            Err(CommandError::WrongTypeForKey)
        } else {
            Ok(None)
        }
    }
}
