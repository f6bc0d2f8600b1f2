//! Closed vocabularies shared by users and reports.
//!
//! Both enums persist by symbolic name (`"UnderInvestigation"`), never by
//! numeric code, and their declaration order is their ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role granted to a registered account.
///
/// # Example
///
/// ```
/// # use civic_backend::domain::UserRole;
/// assert_eq!(UserRole::default(), UserRole::Citizen);
/// assert_eq!("DepartmentHead".parse::<UserRole>(), Ok(UserRole::DepartmentHead));
/// assert!(UserRole::Citizen < UserRole::SuperAdmin);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum UserRole {
    /// Regular user who submits reports.
    #[default]
    Citizen,
    /// Reviews and investigates reports.
    Investigator,
    /// Oversees reports in their department.
    DepartmentHead,
    /// Manages categories, departments and users.
    Admin,
    /// Full system control.
    SuperAdmin,
}

impl UserRole {
    /// All roles in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Citizen,
        Self::Investigator,
        Self::DepartmentHead,
        Self::Admin,
        Self::SuperAdmin,
    ];

    /// Returns the persisted symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "Citizen",
            Self::Investigator => "Investigator",
            Self::DepartmentHead => "DepartmentHead",
            Self::Admin => "Admin",
            Self::SuperAdmin => "SuperAdmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`UserRole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUserRoleError {
    /// The unrecognised name.
    pub input: String,
}

impl fmt::Display for ParseUserRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid user role: {}", self.input)
    }
}

impl std::error::Error for ParseUserRoleError {}

impl FromStr for UserRole {
    type Err = ParseUserRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| ParseUserRoleError {
                input: value.to_owned(),
            })
    }
}

/// Position of a corruption report in its review lifecycle.
///
/// `Draft` is the uninitialised value only; constructed reports start at
/// `Submitted`.
///
/// # Example
///
/// ```
/// # use civic_backend::domain::ReportStatus;
/// assert_eq!(ReportStatus::default(), ReportStatus::Draft);
/// assert_eq!(ReportStatus::UnderInvestigation.as_str(), "UnderInvestigation");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ReportStatus {
    /// Created but not yet submitted.
    #[default]
    Draft,
    /// Sent in by a citizen, waiting for review.
    Submitted,
    /// Investigator assigned, case in progress.
    UnderInvestigation,
    /// Issue addressed or action taken.
    Resolved,
    /// Rejected or found invalid.
    Dismissed,
}

impl ReportStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Submitted,
        Self::UnderInvestigation,
        Self::Resolved,
        Self::Dismissed,
    ];

    /// Returns the persisted symbolic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderInvestigation => "UnderInvestigation",
            Self::Resolved => "Resolved",
            Self::Dismissed => "Dismissed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`ReportStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReportStatusError {
    /// The unrecognised name.
    pub input: String,
}

impl fmt::Display for ParseReportStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid report status: {}", self.input)
    }
}

impl std::error::Error for ParseReportStatusError {}

impl FromStr for ReportStatus {
    type Err = ParseReportStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseReportStatusError {
                input: value.to_owned(),
            })
    }
}
