use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("service error: {0}")]
    Service(#[from] crate::services::ServiceError),

    #[error("not found: {0}")]
    NotFound(String),
}
