pub mod calendar_service;
pub mod case_service;
pub mod scheduler;
pub mod seed;
pub mod session;

pub use calendar_service::{CalendarService, DayAgenda, MonthHighlights, viewer_offset};
pub use case_service::CaseService;
pub use scheduler::SessionReaper;
pub use seed::seed_sample_data;
pub use session::SessionStore;
