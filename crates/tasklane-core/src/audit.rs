//! Audit stamps carried by persisted entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Created / last-modified stamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    /// When the entity was first saved.
    pub created: Option<DateTime<Utc>>,
    /// Who first saved the entity.
    pub created_by: Option<String>,
    /// When the entity was last saved.
    pub last_modified: Option<DateTime<Utc>>,
    /// Who last saved the entity.
    pub last_modified_by: Option<String>,
}

impl AuditInfo {
    /// Stamps both the created and last-modified fields.
    pub fn stamp_created(&mut self, at: DateTime<Utc>, by: Option<&str>) {
        self.created = Some(at);
        self.created_by = by.map(str::to_owned);
        self.stamp_modified(at, by);
    }

    /// Stamps only the last-modified fields.
    pub fn stamp_modified(&mut self, at: DateTime<Utc>, by: Option<&str>) {
        self.last_modified = Some(at);
        self.last_modified_by = by.map(str::to_owned);
    }
}

/// Entities whose saves are audited.
pub trait Auditable {
    /// Read access to the audit stamps.
    fn audit(&self) -> &AuditInfo;

    /// Write access to the audit stamps.
    fn audit_mut(&mut self) -> &mut AuditInfo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamp_created_sets_all_fields() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut audit = AuditInfo::default();

        audit.stamp_created(at, Some("test-user-id"));

        assert_eq!(audit.created, Some(at));
        assert_eq!(audit.created_by.as_deref(), Some("test-user-id"));
        assert_eq!(audit.last_modified, Some(at));
        assert_eq!(audit.last_modified_by.as_deref(), Some("test-user-id"));
    }

    #[test]
    fn test_stamp_modified_leaves_created_untouched() {
        let created = Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap();
        let modified = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut audit = AuditInfo::default();
        audit.stamp_created(created, Some("original-user"));

        audit.stamp_modified(modified, None);

        assert_eq!(audit.created, Some(created));
        assert_eq!(audit.created_by.as_deref(), Some("original-user"));
        assert_eq!(audit.last_modified, Some(modified));
        assert_eq!(audit.last_modified_by, None);
    }
}
