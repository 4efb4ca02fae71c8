use std::sync::Arc;

use chrono::{FixedOffset, Local, NaiveDate, Offset};
use serde::Serialize;

use crate::backend::CaseRepository;
use crate::calendar::{days_with_events, events_on_day, filter_events_by_type};
use crate::error::AppError;
use crate::models::{EventRecord, EventTypeFilter, NewEventRequest};

/// Largest accepted viewer offset, in minutes either side of UTC.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Resolves the viewer's UTC offset in minutes east of UTC, falling back to
/// the server's local offset.
pub fn viewer_offset(minutes_east: Option<i32>) -> Result<FixedOffset, AppError> {
    match minutes_east {
        None => Ok(Local::now().offset().fix()),
        Some(m) if m.abs() <= MAX_OFFSET_MINUTES => FixedOffset::east_opt(m * 60)
            .ok_or_else(|| AppError::BadRequest(format!("invalid utc_offset: {}", m))),
        Some(m) => Err(AppError::BadRequest(format!("invalid utc_offset: {}", m))),
    }
}

#[derive(Debug, Serialize)]
pub struct DayAgenda {
    pub date: NaiveDate,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Serialize)]
pub struct MonthHighlights {
    pub year: i32,
    pub month: u32,
    pub days: Vec<NaiveDate>,
}

pub struct CalendarService {
    repo: Arc<dyn CaseRepository>,
}

impl CalendarService {
    pub fn new(repo: Arc<dyn CaseRepository>) -> Self {
        Self { repo }
    }

    pub async fn events(&self, filter: EventTypeFilter) -> Result<Vec<EventRecord>, AppError> {
        let events = self.repo.fetch_events().await?;
        Ok(filter_events_by_type(&events, filter))
    }

    pub async fn day(
        &self,
        date: NaiveDate,
        filter: EventTypeFilter,
        tz: &FixedOffset,
    ) -> Result<DayAgenda, AppError> {
        let events = self.events(filter).await?;
        let events = events_on_day(&events, date, tz).into_iter().cloned().collect();
        Ok(DayAgenda { date, events })
    }

    pub async fn month(
        &self,
        year: i32,
        month: u32,
        filter: EventTypeFilter,
        tz: &FixedOffset,
    ) -> Result<MonthHighlights, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!("invalid month: {}", month)));
        }
        let events = self.events(filter).await?;
        let days = days_with_events(&events, year, month, tz).into_iter().collect();
        Ok(MonthHighlights { year, month, days })
    }

    pub async fn create(&self, req: NewEventRequest) -> Result<EventRecord, AppError> {
        let req = req.validate()?;
        self.repo.insert_event(req).await
    }
}
