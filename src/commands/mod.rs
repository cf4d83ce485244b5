mod command_dispatcher;
mod command_error;
mod command_handler;
mod command_utils;
mod echo;
mod expire;
mod geo;
mod get;
mod hashes;
mod hyperloglog;
mod keyspace;
mod llen;
mod lpop;
mod lrange;
mod ping;
mod pub_sub;
mod rpush_and_lpush;
mod set;
mod sets;
mod sorted_sets;
mod stream_utils;
mod transactions;
mod type_command;
mod xack;
mod xadd;
mod xgroup;
mod xrange;
mod xread;
mod xreadgroup;

pub use command_dispatcher::Session;
pub use command_error::{CommandError, Missing};
pub use command_handler::{BlockingRequest, CommandHandler};
pub(crate) use pub_sub::publish;
pub(crate) use xread::resolve_last_ids;
