use std::collections::VecDeque;

use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct PushArrayOperations {
    key: String,
    values: Vec<String>,
}

impl PushArrayOperations {
    pub fn parse(arguments: Vec<String>, should_prepend: bool) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            let command = if should_prepend { "lpush" } else { "rpush" };
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            values: arguments[1..].to_vec(),
        })
    }
}

/// Appends values to the tail of a list, creating it if needed. Replies the new length.
pub fn rpush(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    push_array_operations(store, arguments, false)
}

/// Prepends values one by one, so `LPUSH k a b` leaves `b` at the head.
pub fn lpush(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    push_array_operations(store, arguments, true)
}

fn push_array_operations(
    store: &mut KeyValueStore,
    arguments: Vec<String>,
    should_prepend: bool,
) -> Result<Reply, CommandError> {
    let push_array_arguments = PushArrayOperations::parse(arguments, should_prepend)?;

    let DataType::List(list) = store.write_or_create(
        &push_array_arguments.key,
        ValueKind::List,
        || DataType::List(VecDeque::new()),
    )?
    else {
        return Err(CommandError::WrongTypeForKey);
    };

    add_values_to_list(list, push_array_arguments.values, should_prepend);

    Ok(Reply::Integer(list.len() as i64))
}

fn add_values_to_list(list: &mut VecDeque<String>, values: Vec<String>, should_prepend: bool) {
    for value in values {
        if should_prepend {
            list.push_front(value);
        } else {
            list.push_back(value);
        }
    }
}
