use crate::{
    collections::list::normalize_range,
    commands::{command_error::CommandError, command_utils::parse_integer},
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct LrangeArguments {
    key: String,
    start_index: i64,
    end_index: i64,
}

impl LrangeArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 3 {
            return Err(CommandError::WrongNumberOfArguments("lrange".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            start_index: parse_integer(&arguments[1])?,
            end_index: parse_integer(&arguments[2])?,
        })
    }
}

/// Handles the LRANGE command.
///
/// Indices are inclusive and may be negative to count from the tail. An
/// empty array is returned for missing keys and ranges that select nothing.
pub fn lrange(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let lrange_arguments = LrangeArguments::parse(arguments)?;

    let Some(DataType::List(list)) = store.read(&lrange_arguments.key, ValueKind::List)? else {
        return Ok(Reply::empty_array());
    };

    let Ok((start, end)) = normalize_range(
        list.len(),
        lrange_arguments.start_index,
        lrange_arguments.end_index,
    ) else {
        return Ok(Reply::empty_array());
    };

    Ok(Reply::from_strings(list.range(start..=end).cloned()))
}
