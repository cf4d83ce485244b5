use std::fmt;

/// The value a command hands back to its caller.
///
/// Replies carry plain scalars, sequences and string mappings only, so any
/// transport can serialize them however it likes.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Status reply for commands that only acknowledge (`SET`, `MULTI`, ...).
    Ok,
    SimpleString(String),
    BulkString(String),
    Integer(i64),
    /// Absent value: missing key, timed out blocking read.
    Null,
    Array(Vec<Reply>),
    /// Field/value pairs in a stable order (`HGETALL`).
    Map(Vec<(String, String)>),
    /// A failed command inside an `EXEC` result, already rendered.
    Error(String),
}

impl Reply {
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Reply::Array(
            values
                .into_iter()
                .map(|value| Reply::BulkString(value.into()))
                .collect(),
        )
    }

    pub fn from_optional(value: Option<String>) -> Self {
        match value {
            Some(value) => Reply::BulkString(value),
            None => Reply::Null,
        }
    }

    pub fn empty_array() -> Self {
        Reply::Array(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Reply::Null)
    }

    /// Returns the string payload of a simple or bulk string reply.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::SimpleString(s) | Reply::BulkString(s) => Some(s),
            _ => None,
        }
    }

    /// Flattens an array of string replies, skipping anything that is not a string.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Reply::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Reply::SimpleString(s) | Reply::BulkString(s) => Some(s),
                    Reply::Integer(i) => Some(i.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::SimpleString(s) => write!(f, "{}", s),
            Reply::BulkString(s) => write!(f, "\"{}\"", s),
            Reply::Integer(i) => write!(f, "(integer) {}", i),
            Reply::Null => write!(f, "(nil)"),
            Reply::Error(message) => write!(f, "(error) {}", message),
            Reply::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, "\n{:width$}", "", width = indent)?;
                    }
                    let prefix = format!("{}) ", index + 1);
                    write!(f, "{}", prefix)?;
                    item.write_indented(f, indent + prefix.len())?;
                }
                Ok(())
            }
            Reply::Map(pairs) if pairs.is_empty() => write!(f, "(empty hash)"),
            Reply::Map(pairs) => {
                for (index, (field, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        write!(f, "\n{:width$}", "", width = indent)?;
                    }
                    write!(f, "{}# \"{}\" => \"{}\"", index + 1, field, value)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the reply the way `redis-cli` prints it.
impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
