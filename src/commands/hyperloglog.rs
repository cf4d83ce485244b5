use crate::{
    collections::hyperloglog::HyperLogLog,
    commands::command_error::CommandError,
    key_value_store::{DataType, KeyValueStore, ValueKind},
    reply::Reply,
};

pub struct PfaddArguments {
    key: String,
    elements: Vec<String>,
}

impl PfaddArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("pfadd".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            elements: arguments[1..].to_vec(),
        })
    }
}

pub struct PfcountArguments {
    keys: Vec<String>,
}

impl PfcountArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.is_empty() {
            return Err(CommandError::WrongNumberOfArguments("pfcount".to_string()));
        }

        Ok(Self { keys: arguments })
    }
}

/// Adds elements to a HyperLogLog.
///
/// Replies 1 when the key was created or any register changed, 0 otherwise.
pub fn pfadd(store: &mut KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let pfadd_arguments = PfaddArguments::parse(arguments)?;

    let created = store
        .read(&pfadd_arguments.key, ValueKind::HyperLogLog)?
        .is_none();

    let DataType::HyperLogLog(hll) = store.write_or_create(
        &pfadd_arguments.key,
        ValueKind::HyperLogLog,
        || DataType::HyperLogLog(HyperLogLog::new()),
    )?
    else {
        return Err(CommandError::WrongTypeForKey);
    };

    let mut changed = false;
    for element in &pfadd_arguments.elements {
        changed |= hll.add(element);
    }

    Ok(Reply::Integer((created || changed) as i64))
}

/// Estimated cardinality of the union of the given HyperLogLogs.
///
/// Missing keys count as empty sketches.
pub fn pfcount(store: &KeyValueStore, arguments: Vec<String>) -> Result<Reply, CommandError> {
    let pfcount_arguments = PfcountArguments::parse(arguments)?;

    let mut union = HyperLogLog::new();
    for key in &pfcount_arguments.keys {
        if let Some(DataType::HyperLogLog(hll)) = store.read(key, ValueKind::HyperLogLog)? {
            union.merge(hll);
        }
    }

    Ok(Reply::Integer(union.count() as i64))
}
