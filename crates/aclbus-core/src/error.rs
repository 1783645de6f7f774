//! Shared error type across aclBus crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed configuration or call argument.
    InvalidArgument,
    /// Caller failed the ACL check.
    Unauthenticated,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidArgument => "INVALID_ARGUMENT",
            ClientCode::Unauthenticated => "UNAUTHENTICATED",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Why a call was refused by the authorizer.
///
/// Every variant surfaces to the caller as [`ClientCode::Unauthenticated`];
/// the message is stable and safe to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("consumer not found")]
    ConsumerNotFound,
    #[error("unknown consumer")]
    UnknownConsumer,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("bad context")]
    BadContext,
}

impl AuthFailure {
    /// Snake-case label for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthFailure::ConsumerNotFound => "consumer_not_found",
            AuthFailure::UnknownConsumer => "unknown_consumer",
            AuthFailure::MethodNotAllowed => "method_not_allowed",
            AuthFailure::BadContext => "bad_context",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AclBusError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum AclBusError {
    #[error("config: {0}")]
    Config(String),
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] AuthFailure),
    #[error("internal: {0}")]
    Internal(String),
}

impl AclBusError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            AclBusError::Config(_) => ClientCode::InvalidArgument,
            AclBusError::Unauthenticated(_) => ClientCode::Unauthenticated,
            AclBusError::Internal(_) => ClientCode::Internal,
        }
    }
}
