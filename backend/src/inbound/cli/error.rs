//! Command-line mapping for domain errors.
//!
//! Keeps the domain error type transport agnostic while giving every
//! failure a stable process exit code.

use thiserror::Error;

use crate::domain::{Error, ErrorCode, RoleValidationError};

/// Failures surfaced by command handlers.
#[derive(Debug, Error)]
pub enum CliError {
    /// A role identifier argument was malformed.
    #[error("invalid role id: {0}")]
    InvalidRoleId(#[from] RoleValidationError),
    /// The domain refused the operation.
    #[error(transparent)]
    Domain(#[from] Error),
}

fn exit_code_for(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::InvalidRequest => 2,
        ErrorCode::NotFound => 3,
        ErrorCode::Conflict => 4,
        ErrorCode::StoreRejected => 5,
        ErrorCode::ServiceUnavailable => 6,
        ErrorCode::InternalError => 1,
    }
}

impl CliError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidRoleId(_) => exit_code_for(ErrorCode::InvalidRequest),
            Self::Domain(error) => exit_code_for(error.code()),
        }
    }
}
