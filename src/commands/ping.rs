use crate::{commands::command_error::CommandError, reply::Reply};

pub struct PingArguments {
    message: Option<String>,
}

impl PingArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() > 1 {
            return Err(CommandError::WrongNumberOfArguments("ping".to_string()));
        }

        Ok(Self {
            message: arguments.into_iter().next(),
        })
    }
}

/// Replies `PONG`, or echoes the optional message back.
pub fn ping(arguments: Vec<String>) -> Result<Reply, CommandError> {
    let ping_arguments = PingArguments::parse(arguments)?;

    match ping_arguments.message {
        Some(message) => Ok(Reply::BulkString(message)),
        None => Ok(Reply::SimpleString("PONG".to_string())),
    }
}
