use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}
