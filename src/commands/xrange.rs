use crate::{
    commands::{command_error::CommandError, command_utils::parse_count, stream_utils::entries_to_reply},
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
    stream::StreamId,
};

pub struct XrangeArguments {
    key: String,
    start: StreamId,
    end: StreamId,
    count: Option<usize>,
}

impl XrangeArguments {
    /// Parses `XRANGE key start end [COUNT n]`.
    ///
    /// A bound without a sequence number covers the whole millisecond: the
    /// start defaults to sequence 0 and the end to the greatest sequence.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 3 && arguments.len() != 5 {
            return Err(CommandError::WrongNumberOfArguments("xrange".to_string()));
        }

        let count = if arguments.len() == 5 {
            if arguments[3].to_uppercase() != "COUNT" {
                return Err(CommandError::syntax_error());
            }
            Some(parse_count(&arguments[4])?)
        } else {
            None
        };

        Ok(Self {
            key: arguments[0].clone(),
            start: StreamId::parse_bound(&arguments[1], 0)?,
            end: StreamId::parse_bound(&arguments[2], u64::MAX)?,
            count,
        })
    }
}

pub struct XlenArguments {
    key: String,
}

impl XlenArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("xlen".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

/// Handles the XRANGE command: entries with `start <= id <= end`, oldest first.
pub fn xrange(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xrange_arguments = XrangeArguments::parse(arguments)?;

    let Some(DataType::Stream(stream)) = store.read(&xrange_arguments.key, ValueKind::Stream)?
    else {
        return Ok(Reply::empty_array());
    };

    Ok(entries_to_reply(stream.range(
        xrange_arguments.start,
        xrange_arguments.end,
        xrange_arguments.count,
    )))
}

pub fn xlen(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xlen_arguments = XlenArguments::parse(arguments)?;

    match store.read(&xlen_arguments.key, ValueKind::Stream)? {
        Some(DataType::Stream(stream)) => Ok(Reply::Integer(stream.len() as i64)),
        _ => Ok(Reply::Integer(0)),
    }
}
