use crate::{
    collections::{
        list::normalize_range,
        sorted_set::{format_score, parse_score, SortedSet},
    },
    commands::{command_error::CommandError, command_utils::parse_integer},
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct ZaddArguments {
    key: String,
    scored_members: Vec<(f64, String)>,
}

impl ZaddArguments {
    /// Parses `ZADD key score member [score member ...]`.
    ///
    /// Every score is checked before anything is written, so a malformed
    /// score leaves the set untouched.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 3 || (arguments.len() - 1) % 2 != 0 {
            return Err(CommandError::WrongNumberOfArguments("zadd".to_string()));
        }

        let mut scored_members = Vec::with_capacity((arguments.len() - 1) / 2);

        for pair in arguments[1..].chunks(2) {
            let score = parse_score(&pair[0]).ok_or_else(CommandError::not_a_float)?;
            scored_members.push((score, pair[1].clone()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            scored_members,
        })
    }
}

pub struct ZrangeArguments {
    key: String,
    start_index: i64,
    end_index: i64,
    with_scores: bool,
}

impl ZrangeArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 3 && arguments.len() != 4 {
            return Err(CommandError::WrongNumberOfArguments("zrange".to_string()));
        }

        let with_scores = match arguments.get(3) {
            Some(option) if option.to_uppercase() == "WITHSCORES" => true,
            Some(_) => return Err(CommandError::syntax_error()),
            None => false,
        };

        Ok(Self {
            key: arguments[0].clone(),
            start_index: parse_integer(&arguments[1])?,
            end_index: parse_integer(&arguments[2])?,
            with_scores,
        })
    }
}

pub struct ZmemberArguments {
    key: String,
    members: Vec<String>,
}

impl ZmemberArguments {
    pub fn parse(arguments: Vec<String>, command: &str, exact: bool) -> Result<Self, CommandError> {
        let valid = if exact {
            arguments.len() == 2
        } else {
            arguments.len() >= 2
        };

        if !valid {
            return Err(CommandError::WrongNumberOfArguments(command.to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }
}

pub struct ZcardArguments {
    key: String,
}

impl ZcardArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() != 1 {
            return Err(CommandError::WrongNumberOfArguments("zcard".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
        })
    }
}

/// Inserts or updates members; the last score given for a member wins.
/// Replies the number of members that were new.
pub fn zadd(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let zadd_arguments = ZaddArguments::parse(arguments)?;

    let DataType::SortedSet(set) = store.write_or_create(
        &zadd_arguments.key,
        ValueKind::SortedSet,
        || DataType::SortedSet(SortedSet::new()),
    )?
    else {
        return Err(CommandError::WrongTypeForKey);
    };

    let added = zadd_arguments
        .scored_members
        .iter()
        .filter(|(score, member)| set.insert(member, *score))
        .count();

    Ok(Reply::Integer(added as i64))
}

/// Members by ascending score, ties broken by member, using LRANGE index rules.
pub fn zrange(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let zrange_arguments = ZrangeArguments::parse(arguments)?;

    let Some(DataType::SortedSet(set)) = store.read(&zrange_arguments.key, ValueKind::SortedSet)?
    else {
        return Ok(Reply::empty_array());
    };

    let Ok((start, end)) = normalize_range(
        set.len(),
        zrange_arguments.start_index,
        zrange_arguments.end_index,
    ) else {
        return Ok(Reply::empty_array());
    };

    let mut items = Vec::new();
    for entry in set.range(start, end) {
        items.push(Reply::BulkString(entry.member.clone()));
        if zrange_arguments.with_scores {
            items.push(Reply::BulkString(format_score(entry.score)));
        }
    }

    Ok(Reply::Array(items))
}

pub fn zscore(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let zscore_arguments = ZmemberArguments::parse(arguments, "zscore", true)?;

    let Some(DataType::SortedSet(set)) = store.read(&zscore_arguments.key, ValueKind::SortedSet)?
    else {
        return Ok(Reply::Null);
    };

    Ok(Reply::from_optional(
        set.score(&zscore_arguments.members[0]).map(format_score),
    ))
}

pub fn zcard(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let zcard_arguments = ZcardArguments::parse(arguments)?;

    match store.read(&zcard_arguments.key, ValueKind::SortedSet)? {
        Some(DataType::SortedSet(set)) => Ok(Reply::Integer(set.len() as i64)),
        _ => Ok(Reply::Integer(0)),
    }
}

pub fn zrem(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let zrem_arguments = ZmemberArguments::parse(arguments, "zrem", false)?;

    let Some(DataType::SortedSet(set)) =
        store.read_mut(&zrem_arguments.key, ValueKind::SortedSet)?
    else {
        return Ok(Reply::Integer(0));
    };

    let removed = zrem_arguments
        .members
        .iter()
        .filter(|member| set.remove(member))
        .count();

    store.remove_if_empty(&zrem_arguments.key);

    Ok(Reply::Integer(removed as i64))
}
