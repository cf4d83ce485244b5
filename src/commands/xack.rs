use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
    stream::StreamId,
};

pub struct XackArguments {
    key: String,
    group: String,
    ids: Vec<StreamId>,
}

impl XackArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            return Err(CommandError::WrongNumberOfArguments("xack".to_string()));
        }

        let ids = arguments[2..]
            .iter()
            .map(|id| id.parse::<StreamId>())
            .collect::<Result<Vec<StreamId>, CommandError>>()?;

        Ok(Self {
            key: arguments[0].clone(),
            group: arguments[1].clone(),
            ids,
        })
    }
}

pub struct XpendingArguments {
    key: String,
    group: String,
}

impl XpendingArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("xpending".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            group: arguments[1].clone(),
        })
    }
}

/// Removes IDs from the group's pending entries and replies how many were pending.
///
/// A missing stream or group acknowledges nothing.
pub fn xack(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xack_arguments = XackArguments::parse(arguments)?;

    let Some(DataType::Stream(stream)) = store.read_mut(&xack_arguments.key, ValueKind::Stream)?
    else {
        return Ok(Reply::Integer(0));
    };

    let Some(group) = stream.group_mut(&xack_arguments.group) else {
        return Ok(Reply::Integer(0));
    };

    let acknowledged = xack_arguments
        .ids
        .iter()
        .filter(|id| group.acknowledge(id))
        .count();

    Ok(Reply::Integer(acknowledged as i64))
}

/// Summary form of XPENDING: `[count, smallest id, greatest id, [[consumer, count], ...]]`.
///
/// With nothing pending the IDs and the consumer list are `Null`.
pub fn xpending(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xpending_arguments = XpendingArguments::parse(arguments)?;

    let group = match store.read(&xpending_arguments.key, ValueKind::Stream)? {
        Some(DataType::Stream(stream)) => stream.group(&xpending_arguments.group),
        _ => None,
    };

    let Some(group) = group else {
        return Err(CommandError::no_such_group(
            &xpending_arguments.key,
            &xpending_arguments.group,
            "XPENDING",
        ));
    };

    let Some((smallest, greatest)) = group.pending_range() else {
        return Ok(Reply::Array(vec![
            Reply::Integer(0),
            Reply::Null,
            Reply::Null,
            Reply::Null,
        ]));
    };

    let consumers = group
        .pending_per_consumer()
        .into_iter()
        .map(|(consumer, count)| {
            Reply::Array(vec![
                Reply::BulkString(consumer),
                Reply::BulkString(count.to_string()),
            ])
        })
        .collect();

    Ok(Reply::Array(vec![
        Reply::Integer(group.pending_count() as i64),
        Reply::BulkString(smallest.to_string()),
        Reply::BulkString(greatest.to_string()),
        Reply::Array(consumers),
    ]))
}
