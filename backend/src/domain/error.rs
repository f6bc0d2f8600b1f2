//! Domain-level error types.
//!
//! These errors are transport agnostic. Whatever sits in front of the domain
//! maps them to its own response envelope. Every failure is raised at the
//! point of violation, before any entity field is touched.

use thiserror::Error;

use super::{ReportId, ReportStatus, UserId};

/// Why a single input failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationReason {
    /// Empty or whitespace only.
    #[error("must not be blank")]
    Blank,
    /// Fewer characters than allowed.
    #[error("must be at least {min} characters")]
    TooShort {
        /// Minimum character count.
        min: usize,
    },
    /// Contains control characters.
    #[error("must contain only printable characters")]
    NotPrintable,
    /// Not a `local@domain.tld` address.
    #[error("must have the shape local@domain.tld")]
    MalformedEmail,
    /// Not a `type/subtype` media type.
    #[error("must have the shape type/subtype")]
    MalformedMediaType,
    /// Timestamp lies after the clock's current time.
    #[error("must not be in the future")]
    InFuture,
    /// The all-zero UUID.
    #[error("must not be the nil identifier")]
    NilIdentifier,
    /// Zero where a positive count is required.
    #[error("must be greater than zero")]
    Zero,
    /// Symbolic name outside the known set.
    #[error("'{value}' is not a recognised value")]
    UnknownValue {
        /// The rejected input.
        value: String,
    },
    /// The transition table forbids this move.
    #[error("cannot move a report from {current} to {requested}")]
    TransitionNotAllowed {
        /// Status the report is in.
        current: ReportStatus,
        /// Status that was asked for.
        requested: ReportStatus,
    },
}

/// Failures raised by entity constructors, mutators and the hydration path.
///
/// # Examples
/// ```
/// use civic_backend::domain::{DomainError, ValidationReason};
///
/// let err = DomainError::Validation {
///     parameter: "title",
///     reason: ValidationReason::Blank,
/// };
/// assert_eq!(err.parameter(), Some("title"));
/// assert_eq!(err.to_string(), "invalid title: must not be blank");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An input failed a precondition.
    #[error("invalid {parameter}: {reason}")]
    Validation {
        /// Name of the offending input.
        parameter: &'static str,
        /// What was wrong with it.
        reason: ValidationReason,
    },
    /// A required value was absent.
    #[error("{parameter} is required")]
    MissingArgument {
        /// Name of the absent input.
        parameter: &'static str,
    },
    /// A report was offered to a user who did not file it.
    #[error("report {report_id} was filed by {reporter_id} and cannot belong to user {user_id}")]
    Ownership {
        /// The offered report.
        report_id: ReportId,
        /// Who filed it.
        reporter_id: UserId,
        /// Who it was offered to.
        user_id: UserId,
    },
}

impl DomainError {
    pub(crate) const fn validation(parameter: &'static str, reason: ValidationReason) -> Self {
        Self::Validation { parameter, reason }
    }

    pub(crate) const fn blank(parameter: &'static str) -> Self {
        Self::validation(parameter, ValidationReason::Blank)
    }

    pub(crate) const fn nil_identifier(parameter: &'static str) -> Self {
        Self::validation(parameter, ValidationReason::NilIdentifier)
    }

    pub(crate) const fn missing(parameter: &'static str) -> Self {
        Self::MissingArgument { parameter }
    }

    /// Name of the offending parameter, when the error concerns one.
    #[must_use]
    pub const fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::Validation { parameter, .. } | Self::MissingArgument { parameter } => {
                Some(*parameter)
            }
            Self::Ownership { .. } => None,
        }
    }

    /// Validation reason, when the error is a validation failure.
    #[must_use]
    pub const fn reason(&self) -> Option<&ValidationReason> {
        match self {
            Self::Validation { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
