use crate::core::memory_store::upsert;
use crate::domain::filter::ProviderFilter;
use crate::domain::model::ProviderRecord;
use crate::domain::ports::ProviderStore;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Record store backed by a single JSON array file, used by the local CLI.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<ProviderRecord>> {
        // 檔案不存在時視為空的 store
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let data = tokio::fs::read(&self.path).await?;
        let records = serde_json::from_slice(&data)?;
        Ok(records)
    }
}

impl ProviderStore for JsonFileStore {
    async fn scan(&self, filter: &ProviderFilter) -> Result<Vec<ProviderRecord>> {
        let records = self.read_all().await?;
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn put_batch(&self, records: &[ProviderRecord]) -> Result<usize> {
        let mut existing = self.read_all().await?;
        upsert(&mut existing, records);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(&existing)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!(
            "Wrote {} records ({} total) to {}",
            records.len(),
            existing.len(),
            self.path.display()
        );
        Ok(records.len())
    }
}
