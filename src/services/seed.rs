use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::{SqliteStore, repository};
use crate::error::AppError;
use crate::sample::{sample_cases, sample_events};

/// Loads the sample cases and events into an empty store. Returns the number
/// of records written; a store that already has cases is left alone.
pub async fn seed_sample_data(store: &SqliteStore, now: DateTime<Utc>) -> Result<usize, AppError> {
    if !store.is_empty().await? {
        return Ok(0);
    }

    let mut tx = store.pool().begin().await?;
    let cases = sample_cases(now);
    let events = sample_events(now);
    for case in &cases {
        repository::insert_case_record(&mut *tx, case).await?;
    }
    for event in &events {
        repository::insert_event_record(&mut *tx, event).await?;
    }
    tx.commit().await?;

    let written = cases.len() + events.len();
    info!("Seeded {} sample cases and {} events", cases.len(), events.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CaseRepository;

    #[tokio::test]
    async fn test_seed_only_once() {
        let store = SqliteStore::in_memory().await.unwrap();
        let now = Utc::now();

        assert_eq!(seed_sample_data(&store, now).await.unwrap(), 11);
        assert_eq!(seed_sample_data(&store, now).await.unwrap(), 0);

        let cases = store.fetch_cases().await.unwrap();
        assert_eq!(cases.len(), 6);
        assert_eq!(cases[0].case_number, "2023-001");
        assert_eq!(store.fetch_events().await.unwrap().len(), 5);
    }
}
