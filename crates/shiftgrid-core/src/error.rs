use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShiftgridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
}

impl ShiftgridError {
    /// Short error code string, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            ShiftgridError::Config(_) => "CONFIG_ERROR",
            ShiftgridError::InvalidPeriod(_) => "INVALID_PERIOD",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShiftgridError>;
