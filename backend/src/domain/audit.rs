//! Creation and modification provenance shared by every entity.
//!
//! Entities embed an [`AuditTrail`] instead of inheriting audit fields. A
//! trail is only created inside entity constructors, once per entity, so a
//! creation stamp is never applied twice.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::records::AuditRecord;
use super::{DomainError, UserId};

/// Typed identifier of an auditable entity.
pub trait EntityId: Copy + Eq + fmt::Debug + fmt::Display {
    /// Wrap a raw UUID.
    fn from_uuid(uuid: Uuid) -> Self;

    /// Access the underlying UUID.
    fn as_uuid(&self) -> &Uuid;
}

/// Declare a UUID-backed [`EntityId`] newtype.
macro_rules! define_entity_id {
    ($(#[$outer:meta])* pub struct $name:ident;) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an already-parsed UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }

            /// Whether this is the all-zero identifier.
            #[must_use]
            pub const fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl $crate::domain::audit::EntityId for $name {
            fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use define_entity_id;

/// A single modification stamp. Timestamp and principal always travel
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modification {
    at: DateTime<Utc>,
    by: UserId,
}

impl Modification {
    /// When the modification happened.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Who made the modification.
    #[must_use]
    pub const fn by(&self) -> UserId {
        self.by
    }
}

/// Identity plus creation and modification metadata for one entity.
///
/// ## Invariants
/// - `id` and `created_by` are never nil.
/// - `last_modified` is `None` exactly when no mutation happened since
///   creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrail<I> {
    id: I,
    created_at: DateTime<Utc>,
    created_by: UserId,
    last_modified: Option<Modification>,
}

impl<I: EntityId> AuditTrail<I> {
    pub(crate) const fn created(id: I, by: UserId, at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: at,
            created_by: by,
            last_modified: None,
        }
    }

    /// Stamp a modification, replacing any earlier stamp.
    pub(crate) const fn mark_modified(&mut self, by: UserId, at: DateTime<Utc>) {
        self.last_modified = Some(Modification { at, by });
    }

    /// Restore a trail from storage, checking identifiers and that the
    /// modification pair is complete.
    pub fn rehydrate(record: &AuditRecord) -> Result<Self, DomainError> {
        if record.id.is_nil() {
            return Err(DomainError::nil_identifier("id"));
        }
        let created_by = UserId::from_uuid(record.created_by);
        if created_by.is_nil() {
            return Err(DomainError::nil_identifier("created_by"));
        }

        let last_modified = match (record.last_modified_at, record.last_modified_by) {
            (None, None) => None,
            (Some(_), None) => return Err(DomainError::missing("last_modified_by")),
            (None, Some(_)) => return Err(DomainError::missing("last_modified_at")),
            (Some(at), Some(raw_by)) => {
                let by = UserId::from_uuid(raw_by);
                if by.is_nil() {
                    return Err(DomainError::nil_identifier("last_modified_by"));
                }
                Some(Modification { at, by })
            }
        };

        Ok(Self {
            id: I::from_uuid(record.id),
            created_at: record.created_at,
            created_by,
            last_modified,
        })
    }

    /// Flatten the trail into its persisted columns.
    #[must_use]
    pub fn to_record(&self) -> AuditRecord {
        AuditRecord {
            id: *self.id.as_uuid(),
            created_at: self.created_at,
            created_by: *self.created_by.as_uuid(),
            last_modified_at: self.last_modified_at(),
            last_modified_by: self.last_modified_by().map(|by| *by.as_uuid()),
        }
    }

    /// Identifier of the audited entity.
    #[must_use]
    pub const fn id(&self) -> I {
        self.id
    }

    /// When the entity was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Who created the entity.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Latest modification stamp, if any.
    #[must_use]
    pub const fn last_modified(&self) -> Option<Modification> {
        self.last_modified
    }

    /// Timestamp half of [`Self::last_modified`].
    #[must_use]
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified.map(|stamp| stamp.at)
    }

    /// Principal half of [`Self::last_modified`].
    #[must_use]
    pub fn last_modified_by(&self) -> Option<UserId> {
        self.last_modified.map(|stamp| stamp.by)
    }

    /// Whether any mutation happened since creation.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.last_modified.is_some()
    }
}

#[cfg(test)]
mod tests {
    //! Covers stamping and the hydration checks.

    use super::*;
    use crate::domain::ReportId;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn record(created_at: DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            id: Uuid::new_v4(),
            created_at,
            created_by: Uuid::new_v4(),
            last_modified_at: None,
            last_modified_by: None,
        }
    }

    #[rstest]
    fn new_trail_is_unmodified(created_at: DateTime<Utc>) {
        let creator = UserId::random();
        let trail = AuditTrail::created(ReportId::random(), creator, created_at);

        assert_eq!(trail.created_at(), created_at);
        assert_eq!(trail.created_by(), creator);
        assert!(!trail.is_modified());
        assert!(trail.last_modified_at().is_none());
        assert!(trail.last_modified_by().is_none());
    }

    #[rstest]
    fn mark_modified_overwrites_previous_stamp(created_at: DateTime<Utc>) {
        let mut trail = AuditTrail::created(ReportId::random(), UserId::random(), created_at);
        let first_editor = UserId::random();
        let second_editor = UserId::random();

        trail.mark_modified(first_editor, created_at + Duration::minutes(1));
        trail.mark_modified(second_editor, created_at + Duration::minutes(2));

        assert_eq!(trail.last_modified_by(), Some(second_editor));
        assert_eq!(
            trail.last_modified_at(),
            Some(created_at + Duration::minutes(2))
        );
        assert_eq!(trail.created_at(), created_at);
    }

    #[rstest]
    fn record_round_trips_through_rehydrate(created_at: DateTime<Utc>) {
        let mut trail = AuditTrail::created(ReportId::random(), UserId::random(), created_at);
        trail.mark_modified(UserId::random(), created_at + Duration::hours(1));

        let restored =
            AuditTrail::<ReportId>::rehydrate(&trail.to_record()).expect("valid record");
        assert_eq!(restored, trail);
    }

    #[rstest]
    fn rehydrate_rejects_nil_id(mut record: AuditRecord) {
        record.id = Uuid::nil();
        let result = AuditTrail::<ReportId>::rehydrate(&record);
        assert_eq!(result, Err(DomainError::nil_identifier("id")));
    }

    #[rstest]
    fn rehydrate_rejects_nil_creator(mut record: AuditRecord) {
        record.created_by = Uuid::nil();
        let result = AuditTrail::<ReportId>::rehydrate(&record);
        assert_eq!(result, Err(DomainError::nil_identifier("created_by")));
    }

    #[rstest]
    fn rehydrate_requires_principal_with_timestamp(
        mut record: AuditRecord,
        created_at: DateTime<Utc>,
    ) {
        record.last_modified_at = Some(created_at);
        let result = AuditTrail::<ReportId>::rehydrate(&record);
        assert_eq!(result, Err(DomainError::missing("last_modified_by")));
    }

    #[rstest]
    fn rehydrate_requires_timestamp_with_principal(mut record: AuditRecord) {
        record.last_modified_by = Some(Uuid::new_v4());
        let result = AuditTrail::<ReportId>::rehydrate(&record);
        assert_eq!(result, Err(DomainError::missing("last_modified_at")));
    }
}
