pub mod memory_store;
pub mod pipeline;
pub mod scrape;

pub use crate::domain::model::{ProviderFeature, ProviderRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, ProviderStore};
pub use crate::utils::error::Result;
