use crate::{
    commands::{command_error::CommandError, command_utils::parse_count},
    reply::Reply,
    stream::{StreamFields, StreamId},
};

/// Converts stream entries into `[[id, [field, value, ...]], ...]`.
pub fn entries_to_reply<'a, I>(entries: I) -> Reply
where
    I: IntoIterator<Item = (StreamId, &'a StreamFields)>,
{
    Reply::Array(
        entries
            .into_iter()
            .map(|(id, fields)| entry_to_reply(id, Some(fields)))
            .collect(),
    )
}

/// A single entry. An entry deleted from the stream is rendered with a `Null` body.
pub fn entry_to_reply(id: StreamId, fields: Option<&StreamFields>) -> Reply {
    let body = match fields {
        Some(fields) => Reply::from_strings(
            fields
                .iter()
                .flat_map(|(field, value)| [field.clone(), value.clone()]),
        ),
        None => Reply::Null,
    };

    Reply::Array(vec![Reply::BulkString(id.to_string()), body])
}

/// The options that may precede `STREAMS` in XREAD and XREADGROUP.
#[derive(Debug, Default, PartialEq)]
pub struct ReadOptions {
    pub count: Option<usize>,
    pub block_ms: Option<u64>,
    pub noack: bool,
}

/// Splits `[options...] STREAMS key1 key2 ... id1 id2 ...` into its options
/// and `(key, id)` pairs. `allow_noack` is set for XREADGROUP only.
pub fn parse_read_arguments(
    arguments: &[String],
    command: &str,
    allow_noack: bool,
) -> Result<(ReadOptions, Vec<(String, String)>), CommandError> {
    let mut options = ReadOptions::default();
    let mut index = 0;

    loop {
        let Some(argument) = arguments.get(index) else {
            return Err(CommandError::syntax_error());
        };

        match argument.to_uppercase().as_str() {
            "COUNT" => {
                let Some(count) = arguments.get(index + 1) else {
                    return Err(CommandError::syntax_error());
                };
                options.count = Some(parse_count(count)?);
                index += 2;
            }
            "BLOCK" => {
                let Some(block) = arguments.get(index + 1) else {
                    return Err(CommandError::syntax_error());
                };
                options.block_ms = Some(
                    block
                        .parse::<u64>()
                        .map_err(|_| CommandError::invalid_argument("timeout is not an integer or out of range"))?,
                );
                index += 2;
            }
            "NOACK" if allow_noack => {
                options.noack = true;
                index += 1;
            }
            "STREAMS" => {
                index += 1;
                break;
            }
            _ => return Err(CommandError::syntax_error()),
        }
    }

    let data = &arguments[index..];

    if data.is_empty() || data.len() % 2 != 0 {
        return Err(CommandError::InvalidArgument(format!(
            "Unbalanced '{}' list of streams: for each stream key an ID or '$' must be specified.",
            command
        )));
    }

    let split_index = data.len() / 2;
    let key_id_pairs = (0..split_index)
        .map(|i| (data[i].clone(), data[split_index + i].clone()))
        .collect();

    Ok((options, key_id_pairs))
}
