use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[allow(dead_code)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("type registry error: {0}")]
    Registry(String),

    #[error("identity/normalisation error: {0}")]
    Identity(String),

    #[error("external service error: {0}")]
    Service(String),

    #[error("review aggregation error: {0}")]
    Review(String),
}

pub type Result<T> = std::result::Result<T, Error>;
