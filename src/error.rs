//! Error types for the profile store.

use crate::types::StatField;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Username already taken: {0}")]
    DuplicateUser(String),

    #[error("Profile missing for user: {0}")]
    ProfileMissing(String),

    #[error("Statistics missing for user: {0}")]
    StatisticsMissing(String),

    #[error("Invariant violation: {field} = {value} conflicts with {bound_field} = {bound}")]
    InvariantViolation {
        field: StatField,
        value: u64,
        bound_field: StatField,
        bound: u64,
    },

    #[error("Malformed profile document: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Profile store is locked by another process")]
    Locked,
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl StoreError {
    /// Text suitable for a UI status line.
    ///
    /// The core reports typed errors; callers that show something to a player
    /// map them through here instead of formatting errors themselves.
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "Error: Could not access the profile file.",
            StoreError::UserNotFound(_) => "Error: User does not exist.",
            StoreError::DuplicateUser(_) => "Error: Username already taken.",
            StoreError::ProfileMissing(_) => "Error: User profile missing.",
            StoreError::StatisticsMissing(_) => "Error: User statistics missing.",
            StoreError::InvariantViolation { field, .. } => match field {
                StatField::GamesPlayed => {
                    "Error: New games played count cannot be smaller than wins."
                }
                StatField::GamesWin => {
                    "Error: New games win count cannot be greater than games played."
                }
                StatField::GuessTotal => {
                    "Error: New guess total count cannot be less than guess hit."
                }
                StatField::GuessHit => {
                    "Error: New guess hit count cannot be greater than guess total."
                }
            },
            StoreError::Malformed(_) => "Error: Invalid profile format.",
            StoreError::Serialization(_) => "Error: Could not save the profile file.",
            StoreError::Locked => "Error: Profile is in use by another program.",
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
