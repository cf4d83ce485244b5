use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct LlenArguments {
    key: String,
}

impl LlenArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("llen".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

pub fn llen(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let llen_arguments = LlenArguments::parse(arguments)?;

    match store.read(&llen_arguments.key, ValueKind::List)? {
        Some(DataType::List(list)) => Ok(Reply::Integer(list.len() as i64)),
        _ => Ok(Reply::Integer(0)),
    }
}
