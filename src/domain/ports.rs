use crate::domain::filter::ProviderFilter;
use crate::domain::model::{ProviderFeature, ProviderRecord, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Key-value store holding [`ProviderRecord`]s keyed by `id`.
pub trait ProviderStore: Send + Sync {
    /// Full scan; returns every record the filter accepts, in store order.
    fn scan(
        &self,
        filter: &ProviderFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ProviderRecord>>> + Send;

    /// Puts every record, replacing any existing record with the same id.
    /// Returns the number of records written.
    fn put_batch(
        &self,
        records: &[ProviderRecord],
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn providers_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn services_path(&self) -> Option<&str>;
    fn states_path(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ProviderFeature>>;
    async fn transform(&self, features: Vec<ProviderFeature>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<usize>;
}
