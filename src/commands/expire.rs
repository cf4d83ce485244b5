use crate::{
    commands::{command_error::CommandError, set::parse_positive_ttl},
    key_value_store::{KeyTtl, KeyValueStore},
    reply::Reply,
};

pub struct ExpireArguments {
    key: String,
    ttl_ms: u64,
}

impl ExpireArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("expire".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            ttl_ms: parse_positive_ttl(&arguments[1], 1000, "expire")?,
        })
    }
}

/// Arguments of the single-key TTL commands (PERSIST, TTL, PTTL).
pub struct KeyArgument {
    key: String,
}

impl KeyArgument {
    pub fn parse(arguments: Vec<String>, command: &str) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

/// Sets a key's time to live in seconds. Replies 1 if set, 0 if the key is missing.
pub fn expire(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let expire_arguments = ExpireArguments::parse(arguments)?;

    let updated = store.expire(&expire_arguments.key, expire_arguments.ttl_ms);
    Ok(Reply::Integer(updated as i64))
}

/// Clears a key's expiry. Replies 1 if an expiry was removed.
pub fn persist(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let key_argument = KeyArgument::parse(arguments, "persist")?;

    let updated = store.persist(&key_argument.key);
    Ok(Reply::Integer(updated as i64))
}

/// Remaining time to live in seconds, rounded to the nearest second.
///
/// Replies -2 for a missing key and -1 for a key without expiry.
pub fn ttl(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let key_argument = KeyArgument::parse(arguments, "ttl")?;

    Ok(Reply::Integer(match store.ttl_ms(&key_argument.key) {
        KeyTtl::Missing => -2,
        KeyTtl::Persistent => -1,
        KeyTtl::ExpiresIn(ms) => (ms.saturating_add(500) / 1000) as i64,
    }))
}

/// Like TTL, in milliseconds.
pub fn pttl(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let key_argument = KeyArgument::parse(arguments, "pttl")?;

    Ok(Reply::Integer(match store.ttl_ms(&key_argument.key) {
        KeyTtl::Missing => -2,
        KeyTtl::Persistent => -1,
        KeyTtl::ExpiresIn(ms) => i64::try_from(ms).unwrap_or(i64::MAX),
    }))
}
