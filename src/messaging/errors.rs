//! # Messaging Error Types
//!
//! The pipeline's error taxonomy using thiserror for structured error types.
//!
//! The three classes are deliberately distinct and must never be conflated:
//! [`DecodeError`] (payload could not become a typed message, dead-letter),
//! [`RoutingError`] (partition key could not be computed, abandon) and
//! [`BrokerError`] (receive/settlement failures, where only the lock-lost
//! race is recoverable).

use thiserror::Error;

/// Errors reported by the broker capability.
///
/// `LockLost` is the peek-lock race where a delivery's processing lock
/// expired before settlement; callers treat it as recoverable and it is never
/// escalated. Everything else terminates the owning task.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    #[error("message lock was lost")]
    LockLost,

    #[error("receive failed: {message}")]
    Receive { message: String },

    #[error("settlement failed: {operation}: {message}")]
    Settlement { operation: String, message: String },

    #[error("broker connection error: {message}")]
    Connection { message: String },
}

impl BrokerError {
    /// Create a receive error
    pub fn receive(message: impl Into<String>) -> Self {
        Self::Receive {
            message: message.into(),
        }
    }

    /// Create a settlement error
    pub fn settlement(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Settlement {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Whether this error is the recoverable peek-lock expiry race.
    pub fn is_lock_lost(&self) -> bool {
        matches!(self, BrokerError::LockLost)
    }
}

/// A raw delivery body could not be decoded into a typed message.
#[derive(Debug, Error)]
#[error("decode error: {message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        DecodeError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::new(err.to_string())
    }
}

/// A partition key could not be computed for a decoded message.
///
/// Typically a downcast mismatch between the message's discriminator and its
/// concrete type; distinct from [`DecodeError`] by contract.
#[derive(Debug, Clone, Error)]
pub enum RoutingError {
    #[error("invalid received envelope")]
    InvalidEnvelope,

    #[error("invalid discriminator: {discriminator}")]
    InvalidDiscriminator { discriminator: String },

    #[error("partition key unavailable: {message}")]
    Key { message: String },
}

impl RoutingError {
    pub fn invalid_discriminator(discriminator: impl Into<String>) -> Self {
        Self::InvalidDiscriminator {
            discriminator: discriminator.into(),
        }
    }

    pub fn key(message: impl Into<String>) -> Self {
        Self::Key {
            message: message.into(),
        }
    }
}
