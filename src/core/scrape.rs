use crate::core::Pipeline;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub features_seen: usize,
    pub records_written: usize,
    pub records_dropped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct ScrapeEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ScrapeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<ScrapeReport> {
        let started_at = Utc::now();
        tracing::info!("🚀 Starting provider scrape");

        // Extract
        let features = self.pipeline.extract().await?;
        let features_seen = features.len();
        tracing::info!("📥 Extracted {} features", features_seen);

        // Transform
        let result = self.pipeline.transform(features).await?;
        let records_dropped = result.dropped;
        tracing::info!(
            "🔧 Flattened {} records ({} dropped)",
            result.records.len(),
            records_dropped
        );

        // Load
        let records_written = self.pipeline.load(result).await?;
        let finished_at = Utc::now();
        tracing::info!(
            "✅ Wrote {} records in {} ms",
            records_written,
            (finished_at - started_at).num_milliseconds()
        );

        Ok(ScrapeReport {
            features_seen,
            records_written,
            records_dropped,
            started_at,
            finished_at,
        })
    }
}
