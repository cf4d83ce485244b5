use crate::{commands::command_error::CommandError, reply::Reply};

pub struct EchoArguments {
    message: String,
}

impl EchoArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("echo".to_string()));
        }

        Ok(Self {
            message: arguments[0].clone(),
        })
    }
}

pub fn echo(arguments: Vec<String>) -> Result<Reply, CommandError> {
    let echo_arguments = EchoArguments::parse(arguments)?;

    Ok(Reply::BulkString(echo_arguments.message))
}
