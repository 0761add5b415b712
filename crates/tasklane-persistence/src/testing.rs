//! A minimal tracked aggregate for unit tests in this crate.

use tasklane_core::aggregate::AggregateRoot;
use tasklane_core::audit::{AuditInfo, Auditable};
use tasklane_core::event::{DomainEvent, EventMetadata};
use tasklane_test_support::FixedClock;

use crate::record::TodoRecord;
use crate::tracker::TrackedEntity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MemoEvent {
    pub metadata: EventMetadata,
    pub text: String,
}

impl DomainEvent for MemoEvent {
    fn event_type(&self) -> &'static str {
        "MemoEvent"
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "text": self.text })
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Memo {
    pub id: i64,
    pub text: String,
    pub audit: AuditInfo,
    events: Vec<MemoEvent>,
}

impl Memo {
    pub fn new(text: &str) -> Self {
        Self {
            id: 0,
            text: text.to_owned(),
            audit: AuditInfo::default(),
            events: Vec::new(),
        }
    }

    pub fn stored(id: i64, text: &str) -> Self {
        Self {
            id,
            ..Self::new(text)
        }
    }

    pub fn raise(&mut self, text: &str) {
        self.events.push(MemoEvent {
            metadata: EventMetadata::new("MemoEvent", &FixedClock::default()),
            text: text.to_owned(),
        });
    }
}

impl AggregateRoot for Memo {
    type Event = MemoEvent;

    fn domain_events(&self) -> &[MemoEvent] {
        &self.events
    }

    fn clear_domain_events(&mut self) {
        self.events.clear();
    }
}

impl Auditable for Memo {
    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }
}

impl TrackedEntity for Memo {
    const NAME: &'static str = "Memo";

    fn id(&self) -> i64 {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_record(&self) -> TodoRecord {
        TodoRecord {
            id: self.id,
            title: Some(self.text.clone()),
            created: self.audit.created,
            created_by: self.audit.created_by.clone(),
            last_modified: self.audit.last_modified,
            last_modified_by: self.audit.last_modified_by.clone(),
            ..TodoRecord::default()
        }
    }

    fn from_record(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            text: record.title.unwrap_or_default(),
            audit: AuditInfo {
                created: record.created,
                created_by: record.created_by,
                last_modified: record.last_modified,
                last_modified_by: record.last_modified_by,
            },
            events: Vec::new(),
        }
    }
}
