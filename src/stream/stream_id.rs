use std::{fmt, str::FromStr};

use crate::commands::CommandError;

/// A stream entry ID: milliseconds timestamp plus a sequence number.
///
/// IDs order by timestamp first, then sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u64::MAX,
    };

    pub fn new(ms: u64, seq: u64) -> Self {
        Self { ms, seq }
    }

    /// The smallest ID strictly greater than this one.
    pub fn successor(&self) -> Option<StreamId> {
        match self.seq.checked_add(1) {
            Some(seq) => Some(StreamId::new(self.ms, seq)),
            None => self.ms.checked_add(1).map(|ms| StreamId::new(ms, 0)),
        }
    }

    /// Parses a range bound, where a missing sequence defaults to
    /// `default_seq` and `-`/`+` stand for the smallest and greatest IDs.
    pub fn parse_bound(input: &str, default_seq: u64) -> Result<StreamId, CommandError> {
        match input {
            "-" => return Ok(StreamId::MIN),
            "+" => return Ok(StreamId::MAX),
            _ => {}
        }

        let (ms, seq) = match input.split_once('-') {
            Some((ms, seq)) => (ms, Some(seq)),
            None => (input, None),
        };

        let ms = ms.parse::<u64>().map_err(|_| invalid_stream_id())?;
        let seq = match seq {
            Some(seq) => seq.parse::<u64>().map_err(|_| invalid_stream_id())?,
            None => default_seq,
        };

        Ok(StreamId::new(ms, seq))
    }
}

pub fn invalid_stream_id() -> CommandError {
    CommandError::invalid_argument("Invalid stream ID specified as stream command argument")
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

impl FromStr for StreamId {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        StreamId::parse_bound(input, 0)
    }
}

/// The ID requested by an XADD call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdRequest {
    /// `*`: timestamp and sequence are generated.
    Auto,
    /// `<ms>-*`: the sequence is generated.
    AutoSequence(u64),
    Explicit(StreamId),
}

impl IdRequest {
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        if input == "*" {
            return Ok(IdRequest::Auto);
        }

        if let Some((ms, "*")) = input.split_once('-') {
            let ms = ms.parse::<u64>().map_err(|_| invalid_stream_id())?;
            return Ok(IdRequest::AutoSequence(ms));
        }

        if input == "-" || input == "+" {
            return Err(invalid_stream_id());
        }

        Ok(IdRequest::Explicit(input.parse::<StreamId>()?))
    }

    /// Resolves the request into the ID to append after `last_id`.
    ///
    /// `last_id` is `None` for a stream that never held an entry.
    pub fn resolve(&self, last_id: Option<StreamId>, now_ms: u64) -> Result<StreamId, CommandError> {
        let top = last_id.unwrap_or(StreamId::MIN);

        let id = match *self {
            IdRequest::Auto => {
                if now_ms > top.ms {
                    StreamId::new(now_ms, 0)
                } else {
                    top.successor().ok_or_else(id_exhausted)?
                }
            }
            IdRequest::AutoSequence(ms) => {
                if ms > top.ms {
                    StreamId::new(ms, 0)
                } else if ms == top.ms {
                    let seq = top.seq.checked_add(1).ok_or_else(id_not_greater)?;
                    StreamId::new(ms, seq)
                } else {
                    return Err(id_not_greater());
                }
            }
            IdRequest::Explicit(id) => id,
        };

        if id == StreamId::MIN {
            return Err(CommandError::invalid_argument(
                "The ID specified in XADD must be greater than 0-0",
            ));
        }

        if last_id.is_some() && id <= top {
            return Err(id_not_greater());
        }

        Ok(id)
    }
}

fn id_not_greater() -> CommandError {
    CommandError::invalid_argument(
        "The ID specified in XADD is equal or smaller than the target stream top item",
    )
}

fn id_exhausted() -> CommandError {
    CommandError::invalid_argument("The stream has exhausted the last possible ID")
}
