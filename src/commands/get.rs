use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct GetArguments {
    key: String,
}

impl GetArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("get".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

/// Handles the GET command.
///
/// Expired keys are never returned; they read as `Null` like missing ones.
///
/// # Examples
///
/// ```ignore
/// // SET name Ican
/// let result = get(&store, vec!["name".to_string()]);
/// // Returns: Ok(Reply::BulkString("Ican"))
/// ```
pub fn get(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let get_arguments = GetArguments::parse(arguments)?;

    match store.read(&get_arguments.key, ValueKind::String)? {
        Some(DataType::String(value)) => Ok(Reply::BulkString(value.clone())),
        _ => Ok(Reply::Null),
    }
}
