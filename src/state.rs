use std::sync::Arc;

use crate::assistant::Assistant;
use crate::backend::{AuthProvider, CaseRepository};
use crate::services::{CalendarService, CaseService, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn CaseRepository>,
    pub auth: Arc<dyn AuthProvider>,
    pub sessions: SessionStore,
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn cases(&self) -> CaseService {
        CaseService::new(self.repo.clone())
    }

    pub fn calendar(&self) -> CalendarService {
        CalendarService::new(self.repo.clone())
    }
}
