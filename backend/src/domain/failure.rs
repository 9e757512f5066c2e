//! Per-item failure aggregation.
//!
//! Batch operations record one outcome per item instead of returning early.
//! [`Failure`] is the uniform shape every failure is folded into, whether it
//! started life as a validation problem, a missing record, or a store
//! rejection carrying several reasons. Detail messages are never dropped or
//! reworded.

use std::fmt;

use serde::Serialize;

use crate::domain::ports::IdentityStoreError;
use crate::domain::{
    Error, ErrorCode, MembershipAction, MembershipOutcome, ReconciliationResult, UserId,
};

/// Detail recorded when a user id does not resolve.
pub const USER_NOT_FOUND: &str = "user not found";

/// Broad failure category, aligned with [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input failed validation.
    Validation,
    /// The referenced role or user does not exist.
    NotFound,
    /// A name collided with an existing record.
    Duplicate,
    /// The identity store refused the operation.
    Store,
    /// The identity store could not be reached.
    Unavailable,
    /// Anything else.
    Internal,
}

impl FailureKind {
    const fn error_code(self) -> ErrorCode {
        match self {
            Self::Validation => ErrorCode::InvalidRequest,
            Self::NotFound => ErrorCode::NotFound,
            Self::Duplicate => ErrorCode::Conflict,
            Self::Store => ErrorCode::StoreRejected,
            Self::Unavailable => ErrorCode::ServiceUnavailable,
            Self::Internal => ErrorCode::InternalError,
        }
    }

    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Validation => "invalid request",
            Self::NotFound => "not found",
            Self::Duplicate => "already exists",
            Self::Store => "identity store rejected the operation",
            Self::Unavailable => "identity store unavailable",
            Self::Internal => "internal error",
        }
    }
}

impl From<ErrorCode> for FailureKind {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::InvalidRequest => Self::Validation,
            ErrorCode::NotFound => Self::NotFound,
            ErrorCode::Conflict => Self::Duplicate,
            ErrorCode::StoreRejected => Self::Store,
            ErrorCode::ServiceUnavailable => Self::Unavailable,
            ErrorCode::InternalError => Self::Internal,
        }
    }
}

/// A failure with every detail message it was reported with.
///
/// ## Invariants
/// - `messages` is never empty; a failure reported without any reason gets
///   the kind's generic description. Reported messages are kept verbatim,
///   blank ones included.
///
/// # Examples
/// ```
/// use role_admin::domain::{Failure, FailureKind};
///
/// let failure = Failure::with_messages(FailureKind::Store, ["too short", "no digit"]);
/// assert_eq!(failure.messages(), ["too short", "no digit"]);
/// assert_eq!(failure.to_string(), "too short; no digit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    kind: FailureKind,
    messages: Vec<String>,
}

impl Failure {
    /// Failure with a single reason.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::with_messages(kind, [message.into()])
    }

    /// Failure carrying several reasons, kept in order.
    pub fn with_messages<I, M>(kind: FailureKind, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let mut messages: Vec<String> = messages
            .into_iter()
            .map(Into::into)
            .collect();
        if messages.is_empty() {
            messages.push(kind.fallback_message().to_owned());
        }
        Self { kind, messages }
    }

    /// The failure recorded for an id that resolves to no user.
    pub fn user_not_found() -> Self {
        Self::new(FailureKind::NotFound, USER_NOT_FOUND)
    }

    /// Failure category.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Detail messages in reported order.
    pub fn messages(&self) -> &[String] {
        self.messages.as_slice()
    }

    /// Convert into a domain error whose message names the failed operation.
    ///
    /// Store rejections keep their reasons as error details; every other kind
    /// folds its reasons into the message.
    pub fn into_error(self, operation: &str) -> Error {
        match self.kind {
            FailureKind::Store => {
                Error::store_rejected(format!("{operation} rejected"), self.messages)
            }
            kind => Error::new(
                kind.error_code(),
                format!("{operation} failed: {}", self.messages.join("; ")),
            ),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join("; "))
    }
}

impl From<IdentityStoreError> for Failure {
    fn from(value: IdentityStoreError) -> Self {
        match value {
            IdentityStoreError::Rejected { messages } => {
                Self::with_messages(FailureKind::Store, messages.into_vec())
            }
            IdentityStoreError::Duplicate { .. } => {
                Self::new(FailureKind::Duplicate, value.to_string())
            }
            IdentityStoreError::Connection { .. } => {
                Self::new(FailureKind::Unavailable, value.to_string())
            }
            IdentityStoreError::Query { .. } => Self::new(FailureKind::Internal, value.to_string()),
        }
    }
}

impl From<Error> for Failure {
    fn from(value: Error) -> Self {
        let kind = FailureKind::from(value.code());
        if value.details().is_empty() {
            Self::new(kind, value.message())
        } else {
            Self::with_messages(kind, value.details().iter().cloned())
        }
    }
}

/// Ordered log of per-user outcomes for one reconciliation.
///
/// Outcomes are appended in the order they are recorded and never merged,
/// so an id processed twice yields two entries.
#[derive(Debug, Default)]
pub struct OutcomeCollector {
    outcomes: Vec<MembershipOutcome>,
}

impl OutcomeCollector {
    /// Start an empty log sized for the expected number of outcomes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    /// Record a successful membership change.
    pub fn record_success(&mut self, user_id: UserId, action: MembershipAction) {
        self.outcomes.push(MembershipOutcome {
            user_id,
            action,
            failure: None,
        });
    }

    /// Record a failed membership change.
    pub fn record_failure(
        &mut self,
        user_id: UserId,
        action: MembershipAction,
        failure: impl Into<Failure>,
    ) {
        self.outcomes.push(MembershipOutcome {
            user_id,
            action,
            failure: Some(failure.into()),
        });
    }

    /// Record the outcome of a store call, success or failure.
    pub fn record<E>(&mut self, user_id: UserId, action: MembershipAction, result: Result<(), E>)
    where
        E: Into<Failure>,
    {
        match result {
            Ok(()) => self.record_success(user_id, action),
            Err(error) => self.record_failure(user_id, action, error),
        }
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Close the log and hand the outcomes to the caller.
    pub fn finish(self) -> ReconciliationResult {
        ReconciliationResult::new(self.outcomes)
    }
}
