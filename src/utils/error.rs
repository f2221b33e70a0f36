//! Application-level errors

use thiserror::Error;

/// Errors the monitor surfaces to its caller
///
/// Generation-backend and utterance failures are deliberately absent:
/// both degrade softly inside the notifier and never reach this type.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Required settings are missing - fatal to start(), never retried
    #[error("configuration error: {0}")]
    Config(String),

    /// A cycle-level failure from the board service. Recorded as the
    /// monitor's last error; the timer keeps running.
    #[error(transparent)]
    Source(#[from] monday::MondayError),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
