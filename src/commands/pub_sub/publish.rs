use crate::{commands::CommandError, pub_sub::PubSub, reply::Reply};

pub struct PublishArguments {
    pub channel: String,
    pub message: String,
}

impl PublishArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 {
            return Err(CommandError::WrongNumberOfArguments("publish".to_string()));
        }

        Ok(Self {
            channel: arguments[0].clone(),
            message: arguments[1].clone(),
        })
    }
}

/// Replies the number of subscribers that received the message.
pub async fn publish(pub_sub: &PubSub, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let publish_arguments = PublishArguments::parse(arguments)?;

    let receivers = pub_sub
        .publish(&publish_arguments.channel, &publish_arguments.message)
        .await;

    Ok(Reply::Integer(receivers as i64))
}
