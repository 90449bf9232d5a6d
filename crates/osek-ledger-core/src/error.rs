use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid settings: {field} — {reason}")]
    InvalidSettings { field: String, reason: String },

    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid year {0}: must be between 2020 and 2030")]
    InvalidYear(i32),

    #[error("Simulation mode is not active")]
    SimulationInactive,

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::SerializationError(e.to_string())
    }
}
