use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid command line flag '{0}'")]
    InvalidCommandLineFlag(String),
    #[error("Missing value for command line flag '{0}'")]
    MissingCommandLineFlagValue(String),
    #[error("Invalid value '{value}' for command line flag '{flag}'")]
    InvalidCommandLineFlagValue { flag: String, value: String },
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Reject typed commands against keys holding another type.
    pub strict_types: bool,
    /// Active expiry sweep interval in milliseconds; 0 disables the sweeper.
    pub expiry_interval_ms: u64,
    /// Maximum number of keys evicted per sweep.
    pub expiry_budget: usize,
    /// Upper bound for `BLOCK 0` reads.
    pub max_block_ms: u64,
    pub subscribe_channels: Vec<String>,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_types: false,
            expiry_interval_ms: 100,
            expiry_budget: 20,
            max_block_ms: 30_000,
            subscribe_channels: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from command line arguments.
    ///
    /// The first item is the program name and is skipped.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = EngineConfig::from_args(vec![
    ///     "memkv".to_string(),
    ///     "--strict-types".to_string(),
    ///     "--max-block".to_string(),
    ///     "5000".to_string(),
    /// ])?;
    /// ```
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ConfigError> {
        let mut iter = args.into_iter().skip(1);
        let mut config = EngineConfig::default();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--strict-types" => config.strict_types = true,
                "--expiry-interval" => {
                    config.expiry_interval_ms = parse_flag_value(&arg, iter.next())?;
                }
                "--expiry-budget" => {
                    config.expiry_budget = parse_flag_value(&arg, iter.next())?;
                }
                "--max-block" => {
                    config.max_block_ms = parse_flag_value(&arg, iter.next())?;
                }
                "--subscribe" => {
                    let Some(channels) = iter.next() else {
                        return Err(ConfigError::MissingCommandLineFlagValue(arg));
                    };

                    config.subscribe_channels = channels
                        .split(',')
                        .map(|channel| channel.trim())
                        .filter(|channel| !channel.is_empty())
                        .map(|channel| channel.to_string())
                        .collect();

                    if config.subscribe_channels.is_empty() {
                        return Err(ConfigError::InvalidCommandLineFlagValue {
                            flag: arg,
                            value: channels,
                        });
                    }
                }
                "--log-level" => {
                    let Some(level) = iter.next() else {
                        return Err(ConfigError::MissingCommandLineFlagValue(arg));
                    };

                    let level = level.to_lowercase();
                    if !LOG_LEVELS.contains(&level.as_str()) {
                        return Err(ConfigError::InvalidCommandLineFlagValue {
                            flag: arg,
                            value: level,
                        });
                    }

                    config.log_level = level;
                }
                _ => return Err(ConfigError::InvalidCommandLineFlag(arg)),
            }
        }

        Ok(config)
    }

    pub fn expiry_interval(&self) -> Duration {
        Duration::from_millis(self.expiry_interval_ms)
    }

    /// Effective wait for a `BLOCK ms` argument, with 0 meaning "as long as allowed".
    pub fn block_duration(&self, requested_ms: u64) -> Duration {
        if requested_ms == 0 {
            Duration::from_millis(self.max_block_ms)
        } else {
            Duration::from_millis(requested_ms.min(self.max_block_ms))
        }
    }
}

fn parse_flag_value<T: std::str::FromStr>(
    flag: &str,
    value: Option<String>,
) -> Result<T, ConfigError> {
    let Some(value) = value else {
        return Err(ConfigError::MissingCommandLineFlagValue(flag.to_string()));
    };

    value
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidCommandLineFlagValue {
            flag: flag.to_string(),
            value,
        })
}
