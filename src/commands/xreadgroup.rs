use crate::{
    commands::{
        command_error::CommandError,
        stream_utils::{entries_to_reply, entry_to_reply, parse_read_arguments, ReadOptions},
    },
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
    stream::StreamId,
};

/// Represents the parsed arguments for the XREADGROUP command.
///
/// Format: `XREADGROUP GROUP group consumer [COUNT n] [BLOCK ms] [NOACK] STREAMS key... id...`
pub struct XreadgroupArguments {
    group: String,
    consumer: String,
    pub options: ReadOptions,
    key_id_pairs: Vec<(String, String)>,
}

impl XreadgroupArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 6 {
            return Err(CommandError::WrongNumberOfArguments("xreadgroup".to_string()));
        }

        if arguments[0].to_uppercase() != "GROUP" {
            return Err(CommandError::syntax_error());
        }

        let (options, key_id_pairs) = parse_read_arguments(&arguments[3..], "xreadgroup", true)?;

        for (_, id) in &key_id_pairs {
            if id == "$" {
                return Err(CommandError::invalid_argument(
                    "The $ ID is meaningless in the context of XREADGROUP: you want to read the history of this consumer by specifying a proper ID, or use the > ID to get new messages. The $ ID would just return an empty result set.",
                ));
            }
            if id != ">" {
                StreamId::parse_bound(id, 0)?;
            }
        }

        Ok(Self {
            group: arguments[1].clone(),
            consumer: arguments[2].clone(),
            options,
            key_id_pairs,
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.key_id_pairs.iter().map(|(key, _)| key.clone()).collect()
    }
}

/// Handles the XREADGROUP command without blocking.
///
/// With the `>` ID each stream hands over entries no consumer of the group
/// has received yet, records them as pending for this consumer (unless
/// NOACK) and advances the group cursor. Streams without new entries are
/// left out, and `Null` is returned if none had any.
///
/// With an explicit ID the consumer's own pending entries after that ID are
/// returned instead and nothing new is delivered. The consumer is created on
/// first use either way.
pub fn xreadgroup(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xreadgroup_arguments = XreadgroupArguments::parse(arguments)?;
    let now_ms = store.now_ms();
    let group = &xreadgroup_arguments.group;
    let consumer = &xreadgroup_arguments.consumer;
    let options = &xreadgroup_arguments.options;

    // Every key must hold the group before anything is delivered.
    for (key, _) in &xreadgroup_arguments.key_id_pairs {
        let has_group = match store.read(key, ValueKind::Stream)? {
            Some(DataType::Stream(stream)) => stream.group(group).is_some(),
            _ => false,
        };

        if !has_group {
            return Err(no_such_group(key, group));
        }
    }

    let mut streams = Vec::new();

    for (key, id) in &xreadgroup_arguments.key_id_pairs {
        let Some(DataType::Stream(stream)) = store.read_mut(key, ValueKind::Stream)? else {
            return Err(no_such_group(key, group));
        };

        let entries = if id == ">" {
            let delivered = stream
                .read_group_new(group, consumer, options.count, options.noack, now_ms)
                .ok_or_else(|| no_such_group(key, group))?;

            if delivered.is_empty() {
                continue;
            }

            entries_to_reply(delivered.iter().map(|(id, fields)| (*id, fields)))
        } else {
            let after = StreamId::parse_bound(id, 0)?;
            let pending = stream
                .read_group_pending(group, consumer, after, options.count)
                .ok_or_else(|| no_such_group(key, group))?;

            Reply::Array(
                pending
                    .iter()
                    .map(|(id, fields)| entry_to_reply(*id, fields.as_ref()))
                    .collect(),
            )
        };

        streams.push(Reply::Array(vec![Reply::BulkString(key.clone()), entries]));
    }

    if streams.is_empty() {
        return Ok(Reply::Null);
    }

    Ok(Reply::Array(streams))
}

fn no_such_group(key: &str, group: &str) -> CommandError {
    CommandError::no_such_group(key, group, "XREADGROUP with GROUP option")
}
