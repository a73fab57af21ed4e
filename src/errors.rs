//! Error handling for the vote intake system
//!
//! Every validation failure in the intake sequence maps to its own variant so
//! that a transport layer can distinguish bad-input, not-found, conflict and
//! internal failures without parsing messages.

use crate::types::Office;

/// Result type alias for the voting system
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the voting system
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required submission field was absent or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Candidate reference was neither absent, zero (null vote) nor positive
    #[error("Malformed candidate reference: {reference}")]
    MalformedCandidateReference { reference: i32 },

    /// No voter is enrolled under the given national ID
    #[error("Voter not found with national ID: {national_id}")]
    VoterNotFound { national_id: String },

    /// The referenced candidate does not exist in the catalog
    #[error("Candidate not found with ID: {candidate_id}")]
    CandidateNotFound { candidate_id: i32 },

    /// A ballot for this (voter, office) pair has already been accepted
    #[error("Ballot already recorded for voter {national_id} ({})", office_label(.office))]
    DuplicateBallot {
        national_id: String,
        office: Option<Office>,
    },

    /// Validation errors (enrollment and catalog invariants)
    #[error("Validation failed: {field}")]
    Validation { field: String },

    /// Storage-layer failure (lock poisoning, backing store unavailable)
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn office_label(office: &Option<Office>) -> String {
    match office {
        Some(o) => o.to_string(),
        None => "null vote".to_string(),
    }
}

impl Error {
    /// Create a new missing-field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Convenience macro for storage-layer errors
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        $crate::Error::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::storage(format!($fmt, $($arg)*))
    };
}
