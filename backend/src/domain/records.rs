//! Storage-shaped records for the hydration path.
//!
//! Records mirror persisted columns one to one: `id` is the primary key,
//! enums travel as their symbolic names, and the four audit columns sit
//! beside the entity columns. They carry no invariants of their own; the
//! entities' `rehydrate` functions check them on the way back in. Records
//! never pass through the validating constructors, and constructors never
//! accept records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ReportStatus, UserRole};

/// Persisted audit columns shared by every entity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Primary key.
    pub id: Uuid,
    /// Required.
    pub created_at: DateTime<Utc>,
    /// Required.
    pub created_by: Uuid,
    /// Set together with `last_modified_by`.
    pub last_modified_at: Option<DateTime<Utc>>,
    /// Set together with `last_modified_at`.
    pub last_modified_by: Option<Uuid>,
}

/// Persisted form of a [`super::CorruptionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionReportRecord {
    /// Audit columns.
    #[serde(flatten)]
    pub audit: AuditRecord,
    /// `varchar(200)`.
    pub title: String,
    /// Unbounded text.
    pub description: String,
    /// Foreign key to the filing user.
    pub reporter_id: Uuid,
    /// Incident time.
    pub occurred_on: DateTime<Utc>,
    /// Stored by symbolic name.
    pub status: ReportStatus,
}

/// Persisted form of a [`super::User`] together with its reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Audit columns.
    #[serde(flatten)]
    pub audit: AuditRecord,
    /// `varchar(100)`.
    pub username: String,
    /// `varchar(200)`, unique.
    pub email: String,
    /// Opaque hash.
    pub password_hash: String,
    /// Stored by symbolic name.
    pub role: UserRole,
    /// Rows of the reports table owned by this user.
    #[serde(default)]
    pub reports: Vec<CorruptionReportRecord>,
}

/// Persisted form of an [`super::Evidence`] item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Audit columns.
    #[serde(flatten)]
    pub audit: AuditRecord,
    /// Original file name.
    pub file_name: String,
    /// `type/subtype`.
    pub mime_type: String,
    /// Non-zero size.
    pub size_bytes: u64,
    /// Optional digest.
    pub hash: Option<String>,
}
