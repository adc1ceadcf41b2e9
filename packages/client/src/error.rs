//! Error types for the event loop.

use thiserror::Error;

/// Failures of the event loop itself, as opposed to failures of a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopError {
    /// A callback was dropped without ever being enqueued.
    #[error("callback {id} was dropped without completing")]
    CallbackAbandoned { id: u64 },

    /// A completion carried a payload of a different type than registered.
    #[error("completion for callback {id} has an unexpected payload type")]
    PayloadMismatch { id: u64 },

    /// A completion arrived for a call that is not pending.
    #[error("completion for unknown callback {id}")]
    UnknownCall { id: u64 },

    /// The first script step failed.
    #[error("script error: {0}")]
    Script(String),
}

/// Result type alias for event loop operations.
pub type Result<T> = std::result::Result<T, LoopError>;
