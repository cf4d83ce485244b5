use tracing::debug;

use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
    stream::{Stream, StreamId},
};

#[derive(Debug, PartialEq)]
pub enum XgroupArguments {
    Create {
        key: String,
        group: String,
        start: GroupStart,
        mkstream: bool,
    },
    CreateConsumer {
        key: String,
        group: String,
        consumer: String,
    },
    Destroy {
        key: String,
        group: String,
    },
    DelConsumer {
        key: String,
        group: String,
        consumer: String,
    },
}

/// Where a new group starts reading.
#[derive(Debug, PartialEq)]
pub enum GroupStart {
    /// `$`: only entries appended after creation.
    LastEntry,
    /// Entries after this ID; `0` replays the whole history.
    After(StreamId),
}

impl XgroupArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let Some(subcommand) = arguments.first() else {
            return Err(CommandError::WrongNumberOfArguments("xgroup".to_string()));
        };

        let subcommand = subcommand.to_uppercase();
        let rest = &arguments[1..];

        match (subcommand.as_str(), rest.len()) {
            ("CREATE", 3) | ("CREATE", 4) => {
                let mkstream = match rest.get(3) {
                    Some(option) if option.to_uppercase() == "MKSTREAM" => true,
                    Some(_) => return Err(CommandError::syntax_error()),
                    None => false,
                };

                let start = if rest[2] == "$" {
                    GroupStart::LastEntry
                } else {
                    GroupStart::After(StreamId::parse_bound(&rest[2], 0)?)
                };

                Ok(XgroupArguments::Create {
                    key: rest[0].clone(),
                    group: rest[1].clone(),
                    start,
                    mkstream,
                })
            }
            ("CREATECONSUMER", 3) => Ok(XgroupArguments::CreateConsumer {
                key: rest[0].clone(),
                group: rest[1].clone(),
                consumer: rest[2].clone(),
            }),
            ("DESTROY", 2) => Ok(XgroupArguments::Destroy {
                key: rest[0].clone(),
                group: rest[1].clone(),
            }),
            ("DELCONSUMER", 3) => Ok(XgroupArguments::DelConsumer {
                key: rest[0].clone(),
                group: rest[1].clone(),
                consumer: rest[2].clone(),
            }),
            ("CREATE", _) | ("CREATECONSUMER", _) | ("DESTROY", _) | ("DELCONSUMER", _) => Err(
                CommandError::WrongNumberOfArguments(format!("xgroup|{}", subcommand.to_lowercase())),
            ),
            _ => Err(CommandError::InvalidArgument(format!(
                "unknown subcommand '{}'",
                arguments[0]
            ))),
        }
    }
}

fn key_required() -> CommandError {
    CommandError::key_not_found(
        "The XGROUP subcommand requires the key to exist. Note that for CREATE you may want to use the MKSTREAM option to create an empty stream automatically.",
    )
}

fn existing_stream<'a>(store: &'a mut KeyValueStore, key: &str) -> Result<&'a mut Stream, CommandError> {
    match store.read_mut(key, ValueKind::Stream)? {
        Some(DataType::Stream(stream)) => Ok(stream),
        _ => Err(key_required()),
    }
}

/// Handles the XGROUP CREATE, CREATECONSUMER, DESTROY and DELCONSUMER subcommands.
pub fn xgroup(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    match XgroupArguments::parse(arguments)? {
        XgroupArguments::Create {
            key,
            group,
            start,
            mkstream,
        } => {
            let stream = if mkstream {
                let DataType::Stream(stream) = store.write_or_create(&key, ValueKind::Stream, || {
                    DataType::Stream(Stream::new())
                })?
                else {
                    return Err(CommandError::WrongTypeForKey);
                };
                stream
            } else {
                existing_stream(store, &key)?
            };

            let start = match start {
                GroupStart::LastEntry => stream.last_id(),
                GroupStart::After(id) => id,
            };

            stream.create_group(&group, start)?;
            debug!(key = %key, group = %group, start = %start, "consumer group created");

            Ok(Reply::Ok)
        }
        XgroupArguments::CreateConsumer {
            key,
            group,
            consumer,
        } => {
            let stream = existing_stream(store, &key)?;
            let Some(group_state) = stream.group_mut(&group) else {
                return Err(CommandError::no_such_group(&key, &group, "XGROUP CREATECONSUMER"));
            };

            Ok(Reply::Integer(group_state.create_consumer(&consumer) as i64))
        }
        XgroupArguments::Destroy { key, group } => {
            let stream = existing_stream(store, &key)?;

            Ok(Reply::Integer(stream.destroy_group(&group) as i64))
        }
        XgroupArguments::DelConsumer {
            key,
            group,
            consumer,
        } => {
            let stream = existing_stream(store, &key)?;
            let Some(group_state) = stream.group_mut(&group) else {
                return Err(CommandError::no_such_group(&key, &group, "XGROUP DELCONSUMER"));
            };

            Ok(Reply::Integer(group_state.delete_consumer(&consumer) as i64))
        }
    }
}
