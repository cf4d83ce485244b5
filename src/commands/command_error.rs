use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("wrong number of arguments for '{0}' command")]
    WrongNumberOfArguments(String),
    #[error("operation against a key holding the wrong kind of value")]
    WrongTypeForKey,
    #[error("collection is empty")]
    EmptyCollection,
    #[error("{0}")]
    KeyNotFound(Missing),
    #[error("consumer group name already exists")]
    GroupAlreadyExists,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("MULTI calls can not be nested")]
    NestedMulti,
    #[error("EXEC without MULTI")]
    ExecWithoutMulti,
    #[error("DISCARD without MULTI")]
    DiscardWithoutMulti,
    #[error("transaction discarded because of previous errors")]
    TransactionAborted,
}

/// What a command needed but did not find.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Missing {
    #[error("{0}")]
    Key(String),
    #[error("No such key '{key}' or consumer group '{group}' in {command}")]
    Group {
        key: String,
        group: String,
        command: &'static str,
    },
}

impl CommandError {
    pub fn key_not_found(reason: &str) -> Self {
        CommandError::KeyNotFound(Missing::Key(reason.to_string()))
    }

    pub fn no_such_group(key: &str, group: &str, command: &'static str) -> Self {
        CommandError::KeyNotFound(Missing::Group {
            key: key.to_string(),
            group: group.to_string(),
            command,
        })
    }

    pub fn invalid_argument(reason: &str) -> Self {
        CommandError::InvalidArgument(reason.to_string())
    }

    pub fn not_an_integer() -> Self {
        CommandError::invalid_argument("value is not an integer or out of range")
    }

    pub fn not_a_float() -> Self {
        CommandError::invalid_argument("value is not a valid float")
    }

    pub fn syntax_error() -> Self {
        CommandError::invalid_argument("syntax error")
    }

    /// Renders the error the way a Redis server would report it to a client.
    pub fn as_string(&self) -> String {
        match self {
            CommandError::WrongTypeForKey => format!("WRONGTYPE {}", self),
            CommandError::KeyNotFound(missing @ Missing::Group { .. }) => {
                format!("NOGROUP {}", missing)
            }
            CommandError::GroupAlreadyExists => format!("BUSYGROUP {}", self),
            CommandError::TransactionAborted => format!("EXECABORT {}", self),
            _ => format!("ERR {}", self),
        }
    }
}
