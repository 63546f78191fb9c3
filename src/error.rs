//! Error types for the flychat library
//!
//! This module provides the error taxonomy using thiserror. Note that several
//! conditions the assistant encounters are deliberately *not* errors: a
//! missing auth session is a state that redirects to login, and an empty
//! search result is a normal outcome with its own bot message. Only genuine
//! failures (storage, configuration, misuse of the engine API) surface here.

use crate::types::{BookingId, ConversationId, FlightId};
use thiserror::Error;

/// Main error type for flychat operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AssistantError {
    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Auth provider error
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Conversation not found
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Flight not found in the current result set
    #[error("Flight not found in current results: {0}")]
    FlightNotFound(FlightId),

    /// Booking not found
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// No flight has been selected yet
    #[error("No flight selected")]
    NoFlightSelected,

    /// No booking confirmation is pending
    #[error("No booking confirmation pending")]
    NoPendingConfirmation,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage-related errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    /// Serialization failed
    #[error("Storage serialization failed: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Storage deserialization failed: {0}")]
    Deserialization(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Storage backend not available
    #[error("Storage backend not available: {0}")]
    BackendUnavailable(String),

    /// Internal storage error
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Auth-provider errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AuthError {
    /// Sign-in failed
    #[error("Sign in failed: {0}")]
    SignInFailed(String),

    /// Sign-out failed
    #[error("Sign out failed: {0}")]
    SignOutFailed(String),

    /// Provider returned an unexpected response
    #[error("Auth provider error: {0}")]
    Provider(String),
}

/// Type alias for flychat Result
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Type alias for Storage Result
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Type alias for Auth Result
pub type AuthResult<T> = std::result::Result<T, AuthError>;
