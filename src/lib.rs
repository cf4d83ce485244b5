//! An embeddable in-memory data engine with a Redis-like command set.
//!
//! The engine keeps typed values under string keys:
//!
//! - Strings with optional expiry (GET, SET, SETEX, EXPIRE, TTL)
//! - Lists, sets, sorted sets and hashes
//! - Geospatial indexes and HyperLogLog counters
//! - Streams with consumer groups and blocking reads (XADD, XREAD, XREADGROUP)
//! - Publish/subscribe channels
//!
//! Commands are executed through [`Engine::execute`], batched with
//! [`Engine::pipeline`] and [`Engine::transaction`], or issued through a
//! [`Session`] that supports MULTI/EXEC/DISCARD. All state is shared behind
//! Tokio locks so one engine can serve many concurrent tasks.

pub mod clock;
pub mod collections;
pub mod commands;
pub mod config;
pub mod engine;
pub mod expiry;
pub mod input;
pub mod key_value_store;
pub mod pub_sub;
pub mod reply;
pub mod state;
pub mod stream;

pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::{CommandError, CommandHandler, Missing, Session};
pub use config::{ConfigError, EngineConfig};
pub use engine::{BatchResults, Engine};
pub use pub_sub::{Message, PubSub, Subscription};
pub use reply::Reply;
