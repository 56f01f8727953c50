//! Domain model: entities, events, rules and errors.
//!
//! Everything here is synchronous and storage-agnostic. Cross-aggregate rules
//! live in the two services; orchestration against repositories lives in `app`.

pub mod completion;
pub mod deadline;
pub mod errors;
pub mod events;
pub mod ids;
pub mod project;
pub mod task;

pub use completion::ProjectCompletionService;
pub use deadline::DeadlineEnforcementService;
pub use errors::{DomainError, DomainResult, ErrorKind};
pub use events::{DomainEvent, ProjectDeadlineChangedEvent};
pub use ids::{Id, IdMarker, IdParseError, ProjectId, TaskId};
pub use project::Project;
pub use task::Task;
