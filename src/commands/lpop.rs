use crate::{
    commands::{command_error::CommandError, command_utils::parse_count},
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct LpopArguments {
    key: String,
    count: Option<usize>,
}

impl LpopArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.is_empty() || arguments.len() > 2 {
            return Err(CommandError::WrongNumberOfArguments("lpop".to_string()));
        }

        let count = match arguments.get(1) {
            Some(count) => Some(parse_count(count)?),
            None => None,
        };

        Ok(Self {
            key: arguments[0].clone(),
            count,
        })
    }
}

/// Handles the LPOP command.
///
/// Without a count the head element is returned as a bulk string; with a
/// count up to that many head elements are returned as an array. Popping
/// from a missing or empty list fails with `EmptyCollection`, and a list
/// drained to zero elements is deleted.
///
/// # Examples
///
/// ```ignore
/// // RPUSH names a b c
/// lpop(&mut store, vec!["names".to_string()]);
/// // Returns: Ok(Reply::BulkString("a"))
///
/// lpop(&mut store, vec!["names".to_string(), "5".to_string()]);
/// // Returns: Ok(Reply::Array(["b", "c"]))
/// ```
pub fn lpop(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let lpop_arguments = LpopArguments::parse(arguments)?;

    let Some(DataType::List(list)) = store.read_mut(&lpop_arguments.key, ValueKind::List)? else {
        return Err(CommandError::EmptyCollection);
    };

    if list.is_empty() {
        return Err(CommandError::EmptyCollection);
    }

    let reply = match lpop_arguments.count {
        None => Reply::from_optional(list.pop_front()),
        Some(count) => {
            let amount = count.min(list.len());
            Reply::from_strings(list.drain(..amount))
        }
    };

    store.remove_if_empty(&lpop_arguments.key);

    Ok(reply)
}
