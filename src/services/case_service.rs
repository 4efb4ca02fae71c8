use std::sync::Arc;

use tracing::info;

use crate::backend::CaseRepository;
use crate::error::AppError;
use crate::filter::filter_cases;
use crate::models::{CaseRecord, NewCaseRequest, StatusFilter};

pub struct CaseService {
    repo: Arc<dyn CaseRepository>,
}

impl CaseService {
    pub fn new(repo: Arc<dyn CaseRepository>) -> Self {
        Self { repo }
    }

    /// Cases matching `query` and `status`, newest first.
    pub async fn search(&self, query: &str, status: StatusFilter) -> Result<Vec<CaseRecord>, AppError> {
        let cases = self.repo.fetch_cases().await?;
        Ok(filter_cases(&cases, query, status)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn create(&self, req: NewCaseRequest) -> Result<CaseRecord, AppError> {
        let req = req.validate()?;
        let case = self.repo.insert_case(req).await?;
        info!("created case {} ({})", case.case_number, case.id);
        Ok(case)
    }
}
