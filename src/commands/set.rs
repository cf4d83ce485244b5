use crate::{
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore},
    reply::Reply,
};

/// Represents the parsed arguments for the SET and SETEX commands
pub struct SetArguments {
    /// The key name to store the value under
    key: String,
    /// The value to be stored under the given key
    value: String,
    /// Time to live in milliseconds, relative to the moment of execution
    ttl_ms: Option<u64>,
}

impl SetArguments {
    /// Parses `SET key value [EX seconds | PX milliseconds]`.
    ///
    /// # Returns
    ///
    /// * `Ok(SetArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::WrongNumberOfArguments)` - If the number of arguments is not 2 or 4
    /// * `Err(CommandError::InvalidArgument)` - If the option is not EX/PX or the time is not a
    ///   positive integer
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let result = SetArguments::parse(vec![
    ///     "session".to_string(),
    ///     "abc".to_string(),
    ///     "PX".to_string(),
    ///     "1000".to_string()
    /// ]);
    /// // Returns: Ok(SetArguments { key: "session", value: "abc", ttl_ms: Some(1000) })
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 2 && arguments.len() != 4 {
            return Err(CommandError::WrongNumberOfArguments("set".to_string()));
        }

        let mut ttl_ms: Option<u64> = None;

        if arguments.len() == 4 {
            let multiplier = match arguments[2].to_lowercase().as_str() {
                "ex" => 1000,
                "px" => 1,
                _ => return Err(CommandError::syntax_error()),
            };

            ttl_ms = Some(parse_positive_ttl(&arguments[3], multiplier, "set")?);
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            ttl_ms,
        })
    }

    /// Parses `SETEX key seconds value`.
    pub fn parse_setex(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 3 {
            return Err(CommandError::WrongNumberOfArguments("setex".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            ttl_ms: Some(parse_positive_ttl(&arguments[1], 1000, "setex")?),
            value: arguments[2].clone(),
        })
    }
}

/// Parses a strictly positive time amount and scales it to milliseconds.
pub fn parse_positive_ttl(input: &str, multiplier: u64, command: &str) -> Result<u64, CommandError> {
    let amount = input
        .parse::<i64>()
        .map_err(|_| CommandError::not_an_integer())?;

    if amount <= 0 {
        return Err(CommandError::InvalidArgument(format!(
            "invalid expire time in '{}' command",
            command
        )));
    }

    // The remaining time must stay representable as a signed TTL reply.
    (amount as u64)
        .checked_mul(multiplier)
        .filter(|ttl_ms| *ttl_ms <= i64::MAX as u64)
        .ok_or_else(|| {
            CommandError::InvalidArgument(format!("invalid expire time in '{}' command", command))
        })
}

/// Handles the SET command.
///
/// The key is overwritten whatever type it held before. Without an expiry
/// option any previous expiry is cleared.
pub fn set(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let set_arguments = SetArguments::parse(arguments)?;
    store_string(store, set_arguments)
}

/// Handles the SETEX command, a SET with a mandatory expiry in seconds.
pub fn setex(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let set_arguments = SetArguments::parse_setex(arguments)?;
    store_string(store, set_arguments)
}

fn store_string(store: &mut KeyValueStore, set_arguments: SetArguments) -> Result<Reply, CommandError> {
    store.set(
        &set_arguments.key,
        DataType::String(set_arguments.value),
        set_arguments.ttl_ms,
    );

    Ok(Reply::Ok)
}
