pub mod auth;
pub mod case;
pub mod event;

pub use auth::{AuthIdentity, Credentials, Session, SignUpOutcome};
pub use case::{CaseRecord, CaseStatus, NewCaseRequest, StatusFilter};
pub use event::{EventRecord, EventType, EventTypeFilter, NewEventRequest};
