//! Events - ドメインイベント
//!
//! Events are immutable facts recorded by an aggregate while it mutates. They
//! sit in the aggregate's pending buffer until the orchestrating use case
//! drains them; nothing is published globally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::ProjectId;

/// A project's deadline moved from `old_deadline` to `new_deadline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDeadlineChangedEvent {
    pub project_id: ProjectId,
    pub old_deadline: Option<DateTime<Utc>>,
    pub new_deadline: Option<DateTime<Utc>>,
    pub occurred_at: DateTime<Utc>,
}

/// DomainEvent はドメインで発生したイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    ProjectDeadlineChanged(ProjectDeadlineChangedEvent),
}

impl DomainEvent {
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::ProjectDeadlineChanged(e) => e.occurred_at,
        }
    }

    /// Stable name, used as a log field.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ProjectDeadlineChanged(_) => "project_deadline_changed",
        }
    }
}

impl From<ProjectDeadlineChangedEvent> for DomainEvent {
    fn from(event: ProjectDeadlineChangedEvent) -> Self {
        DomainEvent::ProjectDeadlineChanged(event)
    }
}
