use thiserror::Error;

#[derive(Error, Debug)]
pub enum WellError {
    #[error("Well already registered for entity: {0:?}")]
    DuplicateWell(crate::core::types::EntityId),

    #[error("No well registered for entity: {0:?}")]
    UnknownWell(crate::core::types::EntityId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WellError>;
