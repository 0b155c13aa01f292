use thiserror::Error;

/// Failure reported by the generation service or by validating its output.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service unavailable: {0}")]
    Transport(String),

    #[error("malformed generation output: {0}")]
    Malformed(String),

    #[error("generation output violates schema: {0}")]
    SchemaViolation(String),
}

/// Failure reported by the session persistence collaborator.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Failure reported by the identity/profile collaborator.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("profile update rejected: {0}")]
    Rejected(String),
}

/// Errors surfaced by the live session engine.
///
/// Asynchronous collaborator failures are converted into one of these at the
/// call site, so the engine never holds a half-applied turn or record.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0} is not available")]
    CapabilityUnavailable(&'static str),

    #[error("generation contract error: {0}")]
    GenerationContract(#[from] GenerationError),

    #[error("session finalization failed: {0}")]
    Finalization(String),

    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("a reply is already being generated")]
    TurnInFlight,

    #[error("nothing to send")]
    EmptyUtterance,

    #[error("session is {0} and no longer accepts turns")]
    SessionClosed(&'static str),

    #[error("a session is still in progress")]
    SessionInProgress,

    #[error("no active session to end")]
    NoActiveSession,
}

impl From<PersistError> for SessionError {
    fn from(err: PersistError) -> Self {
        SessionError::Finalization(format!("persist error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
