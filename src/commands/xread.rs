use crate::{
    commands::{
        command_error::CommandError,
        stream_utils::{entries_to_reply, parse_read_arguments, ReadOptions},
    },
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
    stream::StreamId,
};

/// Represents the parsed arguments for the XREAD command.
///
/// Format: `XREAD [COUNT n] [BLOCK milliseconds] STREAMS key1 key2 ... id1 id2 ...`
pub struct XreadArguments {
    pub options: ReadOptions,
    /// (key, id) pairs; entries strictly after the ID are returned
    key_id_pairs: Vec<(String, String)>,
}

impl XreadArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let (options, key_id_pairs) = parse_read_arguments(&arguments, "xread", false)?;

        for (_, id) in &key_id_pairs {
            if id != "$" {
                StreamId::parse_bound(id, 0)?;
            }
        }

        Ok(Self {
            options,
            key_id_pairs,
        })
    }

    pub fn keys(&self) -> Vec<String> {
        self.key_id_pairs.iter().map(|(key, _)| key.clone()).collect()
    }
}

/// Handles the XREAD command without blocking.
///
/// Replies `[[key, entries], ...]` for every stream that has entries after
/// the given ID, or `Null` when none has. `$` stands for the stream's last ID.
///
/// # Examples
///
/// ```ignore
/// // XADD orders 1-0 item book
/// let result = xread(&store, vec![
///     "STREAMS".to_string(),
///     "orders".to_string(),
///     "0-0".to_string(),
/// ]);
/// // Returns: Ok([["orders", [["1-0", ["item", "book"]]]]])
/// ```
pub fn xread(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xread_arguments = XreadArguments::parse(arguments)?;
    let mut streams = Vec::new();

    for (key, id) in &xread_arguments.key_id_pairs {
        let Some(DataType::Stream(stream)) = store.read(key, ValueKind::Stream)? else {
            continue;
        };

        let after = if id == "$" {
            stream.last_id()
        } else {
            StreamId::parse_bound(id, 0)?
        };

        let entries = stream.entries_after(after, xread_arguments.options.count);
        if entries.is_empty() {
            continue;
        }

        streams.push(Reply::Array(vec![
            Reply::BulkString(key.clone()),
            entries_to_reply(entries),
        ]));
    }

    if streams.is_empty() {
        return Ok(Reply::Null);
    }

    Ok(Reply::Array(streams))
}

/// Rewrites every `$` ID into the current last ID of its stream.
///
/// A blocked XREAD retries with the rewritten arguments, so it only sees
/// entries appended after the first attempt.
pub fn resolve_last_ids(
    store: &KeyValueStore,
    mut arguments: Vec<String>,
) -> Result<Vec<String>, CommandError> {
    let xread_arguments = XreadArguments::parse(arguments.clone())?;
    let pair_count = xread_arguments.key_id_pairs.len();
    let ids_start = arguments.len() - pair_count;

    for (offset, (key, id)) in xread_arguments.key_id_pairs.iter().enumerate() {
        if id != "$" {
            continue;
        }

        let last_id = match store.read(key, ValueKind::Stream)? {
            Some(DataType::Stream(stream)) => stream.last_id(),
            _ => StreamId::MIN,
        };

        arguments[ids_start + offset] = last_id.to_string();
    }

    Ok(arguments)
}
