use crate::{commands::command_error::CommandError, key_value_store::KeyValueStore, reply::Reply};

/// Parsed arguments of the commands taking one or more keys (DEL, EXISTS).
pub struct KeysArguments {
    keys: Vec<String>,
}

impl KeysArguments {
    pub fn parse(arguments: Vec<String>, command: &str) -> Result<Self, CommandError> {
        if arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self { keys: arguments })
    }
}

pub struct NoArguments;

impl NoArguments {
    pub fn parse(arguments: Vec<String>, command: &str) -> Result<Self, CommandError> {
        if !arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self)
    }
}

/// Removes the given keys and returns how many existed.
pub fn del(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let keys_arguments = KeysArguments::parse(arguments, "del")?;

    let removed = keys_arguments
        .keys
        .iter()
        .filter(|key| store.delete(key))
        .count();

    Ok(Reply::Integer(removed as i64))
}

/// Counts how many of the given keys exist. A key named twice counts twice.
pub fn exists(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let keys_arguments = KeysArguments::parse(arguments, "exists")?;

    let existing = keys_arguments
        .keys
        .iter()
        .filter(|key| store.exists(key))
        .count();

    Ok(Reply::Integer(existing as i64))
}

pub fn dbsize(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    NoArguments::parse(arguments, "dbsize")?;

    Ok(Reply::Integer(store.len() as i64))
}

pub fn flushall(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    NoArguments::parse(arguments, "flushall")?;

    store.clear();
    Ok(Reply::Ok)
}
