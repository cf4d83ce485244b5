//! Parsing of command lines typed at the `memkv` prompt.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("unbalanced quotes in request")]
    UnbalancedQuotes,
    #[error("empty request")]
    EmptyLine,
}

/// Splits a line into a command name and its arguments.
///
/// Arguments are separated by whitespace. A double-quoted argument may
/// contain spaces, and `\"` or `\\` inside quotes stand for the escaped
/// character.
///
/// # Examples
///
/// ```ignore
/// let (name, arguments) = parse_line(r#"SET greeting "hello world""#)?;
/// // Returns: ("SET", vec!["greeting", "hello world"])
/// ```
pub fn parse_line(line: &str) -> Result<(String, Vec<String>), InputError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();

        if first == '"' {
            chars.next();
            let mut closed = false;

            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped) => token.push(escaped),
                        None => return Err(InputError::UnbalancedQuotes),
                    },
                    _ => token.push(c),
                }
            }

            if !closed || chars.peek().is_some_and(|c| !c.is_whitespace()) {
                return Err(InputError::UnbalancedQuotes);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                token.push(c);
            }
        }

        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(InputError::EmptyLine);
    }

    let name = tokens.remove(0);
    Ok((name, tokens))
}
