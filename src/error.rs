//! Domain-specific error types for metaphor-unpacker

use thiserror::Error;

/// Main error type for the metaphor-unpacker application
#[derive(Error, Debug)]
pub enum UnpackerError {
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<toml::de::Error> for UnpackerError {
    fn from(err: toml::de::Error) -> Self {
        UnpackerError::Config {
            message: format!("Invalid config file: {}", err),
        }
    }
}

/// Result type alias for metaphor-unpacker operations
pub type Result<T> = std::result::Result<T, UnpackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_maps_to_config() {
        let err = toml::from_str::<toml::Value>("model = ").unwrap_err();
        let mapped: UnpackerError = err.into();
        assert!(matches!(mapped, UnpackerError::Config { .. }));
        assert!(mapped.to_string().starts_with("Configuration error"));
        assert!(mapped.to_string().contains("Invalid config file"));
    }
}
