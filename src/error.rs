//! Shared error taxonomy for the auth gate and its validators.
//!
//! Kept as a hand-written enum with a manual `Display`/`Error` impl, in the
//! style this codebase already uses for its other upstream-facing error type
//! (`rpc::error::RpcError`), rather than reaching for a derive-macro error
//! crate this binary doesn't otherwise depend on.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthGateError {
    /// Network-level failure or an unexpected status from an upstream validator.
    Transport(String),
    /// Identity validator returned 401, or reported user `"0"`.
    Unauthorized,
    /// Identity validator returned 403, or the board validator denied access.
    Forbidden,
    /// Identity validator returned 500.
    InternalUpstream,
    /// A validator response body failed to parse as the expected shape.
    Decode(String),
}

impl fmt::Display for AuthGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::InternalUpstream => write!(f, "internal error from upstream validator"),
            Self::Decode(msg) => write!(f, "failed to decode validator response: {msg}"),
        }
    }
}

impl std::error::Error for AuthGateError {}

/// Why an inbound message was dropped instead of acted on. Never sent to the
/// client; logged at debug level only — the protocol is deliberately silent
/// on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    Malformed,
    UnknownEvent(String),
    Auth(AuthGateError),
    PreconditionFailed(&'static str),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed message"),
            Self::UnknownEvent(event) => write!(f, "unknown event: {event}"),
            Self::Auth(err) => write!(f, "auth gate rejected message: {err}"),
            Self::PreconditionFailed(reason) => write!(f, "precondition failed: {reason}"),
        }
    }
}

impl std::error::Error for MessageError {}

impl From<AuthGateError> for MessageError {
    fn from(err: AuthGateError) -> Self {
        Self::Auth(err)
    }
}
