//! Argument parsing shared by the command modules.

use crate::commands::command_error::CommandError;

pub fn parse_integer(input: &str) -> Result<i64, CommandError> {
    input
        .parse::<i64>()
        .map_err(|_| CommandError::not_an_integer())
}

/// Parses a COUNT-like argument, which must be a positive integer.
pub fn parse_count(input: &str) -> Result<usize, CommandError> {
    match input.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(CommandError::invalid_argument(
            "value is out of range, must be positive",
        )),
    }
}

pub fn parse_float(input: &str) -> Result<f64, CommandError> {
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::not_a_float()),
    }
}

/// Splits `[a1, b1, a2, b2, ...]` into pairs, failing on a dangling element.
pub fn parse_pairs(arguments: &[String], command: &str) -> Result<Vec<(String, String)>, CommandError> {
    if arguments.is_empty() || arguments.len() % 2 != 0 {
        return Err(CommandError::WrongNumberOfArguments(command.to_string()));
    }

    Ok(arguments
        .chunks(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}
