use crate::{
    collections::set::OrderedSet,
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

/// Arguments of the set commands taking a key and one or more members.
pub struct SetMembersArguments {
    key: String,
    members: Vec<String>,
}

impl SetMembersArguments {
    pub fn parse(arguments: Vec<String>, command: &str) -> Result<Self, CommandError> {
        if arguments.len() < 2 {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }
}

pub struct SetKeyArguments {
    key: String,
}

impl SetKeyArguments {
    pub fn parse(arguments: Vec<String>, command: &str) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

pub struct SismemberArguments {
    key: String,
    member: String,
}

impl SismemberArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("sismember".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            member: arguments[1].clone(),
        })
    }
}

/// Adds members to a set and replies how many were not already present.
pub fn sadd(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let sadd_arguments = SetMembersArguments::parse(arguments, "sadd")?;

    let DataType::Set(set) = store.write_or_create(&sadd_arguments.key, ValueKind::Set, || {
        DataType::Set(OrderedSet::new())
    })?
    else {
        return Err(CommandError::WrongTypeForKey);
    };

    let added = sadd_arguments
        .members
        .iter()
        .filter(|member| set.insert(member))
        .count();

    Ok(Reply::Integer(added as i64))
}

/// Members in the order they were first added.
pub fn smembers(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let smembers_arguments = SetKeyArguments::parse(arguments, "smembers")?;

    match store.read(&smembers_arguments.key, ValueKind::Set)? {
        Some(DataType::Set(set)) => Ok(Reply::from_strings(set.iter().cloned())),
        _ => Ok(Reply::empty_array()),
    }
}

pub fn sismember(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let sismember_arguments = SismemberArguments::parse(arguments)?;

    match store.read(&sismember_arguments.key, ValueKind::Set)? {
        Some(DataType::Set(set)) => Ok(Reply::Integer(
            set.contains(&sismember_arguments.member) as i64,
        )),
        _ => Ok(Reply::Integer(0)),
    }
}

pub fn scard(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let scard_arguments = SetKeyArguments::parse(arguments, "scard")?;

    match store.read(&scard_arguments.key, ValueKind::Set)? {
        Some(DataType::Set(set)) => Ok(Reply::Integer(set.len() as i64)),
        _ => Ok(Reply::Integer(0)),
    }
}

pub fn srem(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let srem_arguments = SetMembersArguments::parse(arguments, "srem")?;

    let Some(DataType::Set(set)) = store.read_mut(&srem_arguments.key, ValueKind::Set)? else {
        return Ok(Reply::Integer(0));
    };

    let removed = srem_arguments
        .members
        .iter()
        .filter(|member| set.remove(member))
        .count();

    store.remove_if_empty(&srem_arguments.key);

    Ok(Reply::Integer(removed as i64))
}
