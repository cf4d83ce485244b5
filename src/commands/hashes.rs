use crate::{
    collections::hash::HashValue,
    commands::{command_error::CommandError, command_utils::parse_pairs},
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct HsetArguments {
    key: String,
    field_values: Vec<(String, String)>,
}

impl HsetArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            return Err(CommandError::WrongNumberOfArguments("hset".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            field_values: parse_pairs(&arguments[1..], "hset")?,
        })
    }
}

pub struct HfieldArguments {
    key: String,
    fields: Vec<String>,
}

impl HfieldArguments {
    pub fn parse(arguments: Vec<String>, command: &str, exact: bool) -> Result<Self, CommandError> {
        let valid = if exact {
            arguments.len() == 2
        } else {
            arguments.len() >= 2
        };

        if !valid {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            fields: arguments[1..].to_vec(),
        })
    }
}

pub struct HgetallArguments {
    key: String,
}

impl HgetallArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("hgetall".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

/// Upserts field/value pairs and replies how many fields were new.
pub fn hset(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let hset_arguments = HsetArguments::parse(arguments)?;

    let DataType::Hash(hash) = store.write_or_create(&hset_arguments.key, ValueKind::Hash, || {
        DataType::Hash(HashValue::new())
    })?
    else {
        return Err(CommandError::WrongTypeForKey);
    };

    let added = hset_arguments
        .field_values
        .iter()
        .filter(|(field, value)| hash.insert(field, value))
        .count();

    Ok(Reply::Integer(added as i64))
}

pub fn hget(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let hget_arguments = HfieldArguments::parse(arguments, "hget", true)?;

    match store.read(&hget_arguments.key, ValueKind::Hash)? {
        Some(DataType::Hash(hash)) => Ok(Reply::from_optional(
            hash.get(&hget_arguments.fields[0]).cloned(),
        )),
        _ => Ok(Reply::Null),
    }
}

/// All field/value pairs in insertion order.
pub fn hgetall(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let hgetall_arguments = HgetallArguments::parse(arguments)?;

    match store.read(&hgetall_arguments.key, ValueKind::Hash)? {
        Some(DataType::Hash(hash)) => Ok(Reply::Map(
            hash.iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        )),
        _ => Ok(Reply::Map(Vec::new())),
    }
}

pub fn hdel(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let hdel_arguments = HfieldArguments::parse(arguments, "hdel", false)?;

    let Some(DataType::Hash(hash)) = store.read_mut(&hdel_arguments.key, ValueKind::Hash)? else {
        return Ok(Reply::Integer(0));
    };

    let removed = hdel_arguments
        .fields
        .iter()
        .filter(|field| hash.remove(field))
        .count();

    store.remove_if_empty(&hdel_arguments.key);

    Ok(Reply::Integer(removed as i64))
}
