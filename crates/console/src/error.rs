//! Error types for the console.

/// Errors produced by console operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Counter \"{0}\" doesn’t exist.")]
    CounterNotFound(String),

    #[error("unknown console method: {0}")]
    UnknownMethod(String),

    #[error("invalid console configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("global console already initialized")]
    AlreadyInitialized,

    #[error("global console not initialized")]
    NotInitialized,

    #[error("global console is already in use on this thread")]
    ReentrantAccess,
}
