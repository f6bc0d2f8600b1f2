//! Evidence files attached to investigations.
//!
//! Evidence is auditable like every other entity: the uploading principal
//! is recorded as its creator.

use std::fmt;

use mockable::Clock;
use tracing::debug;

use super::audit::{AuditTrail, define_entity_id};
use super::records::EvidenceRecord;
use super::text::trimmed_non_blank;
use super::{DomainError, UserId, ValidationReason};

define_entity_id! {
    /// Stable evidence identifier.
    pub struct EvidenceId;
}

/// Lower-cased `type/subtype` media type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

impl MediaType {
    /// Trim, lower-case and check the `type/subtype` shape.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let value = trimmed_non_blank("mime_type", raw.as_ref())?.to_ascii_lowercase();
        let well_formed = value.split_once('/').is_some_and(|(kind, subtype)| {
            !kind.is_empty()
                && !subtype.is_empty()
                && !subtype.contains('/')
                && !value.chars().any(char::is_whitespace)
        });
        if !well_formed {
            return Err(DomainError::validation(
                "mime_type",
                ValidationReason::MalformedMediaType,
            ));
        }
        Ok(Self(value))
    }

    /// Top-level type, e.g. `image` for `image/png`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.0.split_once('/').map_or(self.0.as_str(), |(kind, _)| kind)
    }
}

impl AsRef<str> for MediaType {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Input payload for [`Evidence::new`].
#[derive(Debug, Clone)]
pub struct EvidenceDraft {
    /// Original file name.
    pub file_name: String,
    /// Media type such as `image/png`.
    pub mime_type: String,
    /// File size; must be non-zero.
    pub size_bytes: u64,
    /// Optional content digest.
    pub hash: Option<String>,
    /// Uploading principal.
    pub uploaded_by: UserId,
}

/// An uploaded file backing a report.
///
/// ## Invariants
/// - `file_name` is trimmed and never blank.
/// - `size_bytes` is greater than zero.
/// - `hash`, when present, is trimmed and never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    audit: AuditTrail<EvidenceId>,
    file_name: String,
    mime_type: MediaType,
    size_bytes: u64,
    hash: Option<String>,
}

impl Evidence {
    /// Record an upload. Fields are checked in declaration order, the
    /// uploader last.
    pub fn new(draft: EvidenceDraft, clock: &dyn Clock) -> Result<Self, DomainError> {
        let EvidenceDraft {
            file_name: raw_file_name,
            mime_type: raw_mime_type,
            size_bytes: raw_size_bytes,
            hash: raw_hash,
            uploaded_by,
        } = draft;

        let file_name = trimmed_non_blank("file_name", &raw_file_name)?;
        let mime_type = MediaType::new(raw_mime_type)?;
        let size_bytes = non_zero_size(raw_size_bytes)?;
        let hash = optional_hash(raw_hash)?;
        if uploaded_by.is_nil() {
            return Err(DomainError::nil_identifier("uploaded_by"));
        }

        let id = EvidenceId::random();
        debug!(
            evidence_id = %id,
            uploaded_by = %uploaded_by,
            mime_type = %mime_type,
            "evidence recorded"
        );
        Ok(Self {
            audit: AuditTrail::created(id, uploaded_by, clock.utc()),
            file_name,
            mime_type,
            size_bytes,
            hash,
        })
    }

    /// Restore evidence from storage, re-running the upload checks except
    /// the uploader one, which the audit trail covers.
    pub fn rehydrate(record: EvidenceRecord) -> Result<Self, DomainError> {
        Ok(Self {
            audit: AuditTrail::rehydrate(&record.audit)?,
            file_name: trimmed_non_blank("file_name", &record.file_name)?,
            mime_type: MediaType::new(record.mime_type)?,
            size_bytes: non_zero_size(record.size_bytes)?,
            hash: optional_hash(record.hash)?,
        })
    }

    /// Flatten the evidence into its persisted columns.
    #[must_use]
    pub fn to_record(&self) -> EvidenceRecord {
        EvidenceRecord {
            audit: self.audit.to_record(),
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.to_string(),
            size_bytes: self.size_bytes,
            hash: self.hash.clone(),
        }
    }

    /// Stable evidence identifier.
    #[must_use]
    pub const fn id(&self) -> EvidenceId {
        self.audit.id()
    }

    /// Trimmed file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Normalised media type.
    #[must_use]
    pub const fn mime_type(&self) -> &MediaType {
        &self.mime_type
    }

    /// File size in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Content digest, if one was supplied.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Principal who uploaded the file.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.audit.created_by()
    }

    /// Creation and modification metadata.
    #[must_use]
    pub const fn audit(&self) -> &AuditTrail<EvidenceId> {
        &self.audit
    }
}

const fn non_zero_size(size_bytes: u64) -> Result<u64, DomainError> {
    if size_bytes == 0 {
        return Err(DomainError::validation("size_bytes", ValidationReason::Zero));
    }
    Ok(size_bytes)
}

fn optional_hash(raw: Option<String>) -> Result<Option<String>, DomainError> {
    raw.map(|digest| trimmed_non_blank("hash", &digest))
        .transpose()
}
