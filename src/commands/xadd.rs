use crate::{
    commands::{command_error::CommandError, command_utils::parse_pairs},
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
    stream::{IdRequest, Stream, StreamFields},
};

/// Represents the parsed arguments for the XADD command
pub struct XaddArguments {
    /// Key of the stream to append to
    pub key: String,
    /// `*`, `<ms>-*` or an explicit ID
    id_request: IdRequest,
    /// Field/value pairs in the order given
    fields: StreamFields,
}

impl XaddArguments {
    /// Parses `XADD key id field value [field value ...]`.
    ///
    /// # Returns
    ///
    /// * `Ok(XaddArguments)` - Successfully parsed arguments
    /// * `Err(CommandError::WrongNumberOfArguments)` - If there is no complete field/value pair
    /// * `Err(CommandError::InvalidArgument)` - If the ID is malformed
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let args = XaddArguments::parse(vec![
    ///     "orders".to_string(),
    ///     "*".to_string(),
    ///     "item".to_string(),
    ///     "book".to_string(),
    /// ])?;
    /// ```
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 4 {
            return Err(CommandError::WrongNumberOfArguments("xadd".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            id_request: IdRequest::parse(&arguments[1])?,
            fields: parse_pairs(&arguments[2..], "xadd")?,
        })
    }
}

/// Handles the XADD command.
///
/// Appends an entry, creating the stream if needed, and replies the new ID.
/// Waking blocked readers is left to the caller, which owns the shared state.
pub fn xadd(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let xadd_arguments = XaddArguments::parse(arguments)?;
    let now_ms = store.now_ms();

    let id = match store.read_mut(&xadd_arguments.key, ValueKind::Stream)? {
        Some(DataType::Stream(stream)) => {
            stream.append(xadd_arguments.id_request, xadd_arguments.fields, now_ms)?
        }
        _ => {
            // The stream is only stored once the first entry was accepted.
            let mut stream = Stream::new();
            let id = stream.append(xadd_arguments.id_request, xadd_arguments.fields, now_ms)?;
            store.write_or_create(&xadd_arguments.key, ValueKind::Stream, || {
                DataType::Stream(stream)
            })?;
            id
        }
    };

    Ok(Reply::BulkString(id.to_string()))
}
