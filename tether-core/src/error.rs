//! Error Types
//!
//! Errors fall into three groups:
//!
//! - Construction errors: a view or attribute that cannot be rendered, or
//!   reactive state created against a closed session. These surface to the
//!   caller of `render` or of the page function.
//! - Protocol errors: a handshake or trigger frame the session cannot honour.
//!   They close the offending connection and nothing else.
//! - Callback errors: an application callback failed while dispatching a
//!   trigger. Logged, then the connection is closed.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// Reactive state was created with a context whose session has ended.
    #[error("reactive state can only be created inside an active session")]
    InactiveSession,

    /// A style without a class name was attached to an element attribute.
    #[error("global style used as the `{attribute}` attribute of <{tag}>")]
    GlobalStyleAttribute { tag: String, attribute: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A callback received a different number of arguments than it takes.
    #[error("callback expects {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    #[error("invalid callback arguments: {0}")]
    Arguments(#[from] serde_json::Error),

    /// An application callback returned an error or panicked.
    #[error("callback failed: {0}")]
    Callback(String),

    #[error("transport error: {0}")]
    Transport(String),

    /// A page function failed to build its view.
    #[error("page construction failed: {0}")]
    Page(String),
}

/// Violations of the trigger/update wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0:?}")]
    Malformed(String),

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("no handler registered for `{0}`")]
    UnknownHandler(String),

    #[error("unknown session `{0}`")]
    UnknownSession(String),

    /// The handshake arrived on a different path than the page request.
    #[error("session `{id}` belongs to `{expected}`, not `{got}`")]
    RouteMismatch {
        id: String,
        expected: String,
        got: String,
    },
}
