use thiserror::Error;

/// Task lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// `start` was called while a session is already running. The running
    /// session is left untouched.
    #[error("task is already running")]
    AlreadyRunning,

    /// The task configuration cannot drive a session.
    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),
}
