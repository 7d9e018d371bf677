use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is unknown. Use \"add_config\" to add new attribute.")]
    UnknownAttribute(String),

    #[error("Mutator for property '{0}' is not defined")]
    MissingMutator(String),

    #[error("Config '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Expected a JSON object at the top level")]
    NotAnObject,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
