use crate::domain::filter::ProviderFilter;
use crate::domain::model::ProviderRecord;
use crate::domain::ports::ProviderStore;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local store that keeps insertion order; scans walk every record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<Vec<ProviderRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ProviderRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub async fn get(&self, id: &str) -> Option<ProviderRecord> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

/// Upsert by id: an existing record keeps its position, new ids are appended.
pub(crate) fn upsert(existing: &mut Vec<ProviderRecord>, incoming: &[ProviderRecord]) {
    for record in incoming {
        match existing.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => existing.push(record.clone()),
        }
    }
}

impl ProviderStore for InMemoryStore {
    async fn scan(&self, filter: &ProviderFilter) -> Result<Vec<ProviderRecord>> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn put_batch(&self, records: &[ProviderRecord]) -> Result<usize> {
        let mut existing = self.records.lock().await;
        upsert(&mut existing, records);
        Ok(records.len())
    }
}
