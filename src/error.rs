use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },
}

impl StatsError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StatsError::DataUnavailable {
            message: message.into(),
        }
    }
}
