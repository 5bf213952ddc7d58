use crate::config::types::{Config, ReaderConfig};
use crate::ConfigError;

/// Upper bound for `max-line-length`
const MAX_LINE_LENGTH_CEILING: usize = 16 * 1024 * 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_reader_config(&config.reader)?;
    Ok(())
}

/// Validates reader configuration
fn validate_reader_config(config: &ReaderConfig) -> Result<(), ConfigError> {
    if config.max_line_length < 1 || config.max_line_length > MAX_LINE_LENGTH_CEILING {
        return Err(ConfigError::Validation(format!(
            "max-line-length must be between 1 and {}, got {}",
            MAX_LINE_LENGTH_CEILING, config.max_line_length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_line_length() {
        let mut config = Config::default();
        assert!(validate(&config).is_ok());

        config.reader.max_line_length = 0;
        assert!(validate(&config).is_err());

        config.reader.max_line_length = MAX_LINE_LENGTH_CEILING;
        assert!(validate(&config).is_ok());

        config.reader.max_line_length = MAX_LINE_LENGTH_CEILING + 1;
        assert!(validate(&config).is_err());
    }
}
