use crate::{commands::command_error::CommandError, key_value_store::KeyValueStore, reply::Reply};

pub struct TypeArguments {
    key: String,
}

impl TypeArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("type".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

pub fn type_command(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let type_arguments = TypeArguments::parse(arguments)?;

    let type_name = match store.kind_of(&type_arguments.key) {
        Some(kind) => kind.type_name(),
        None => "none",
    };

    Ok(Reply::SimpleString(type_name.to_string()))
}
