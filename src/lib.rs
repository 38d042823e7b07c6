pub mod config;
pub mod core;
pub mod domain;
pub mod finder;
pub mod utils;

pub use config::cli::JsonFileStore;
pub use config::toml_config::FileConfig;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{DynamoDbStore, LambdaConfig};

pub use core::{memory_store::InMemoryStore, pipeline::ProviderPipeline, scrape::ScrapeEngine};
pub use domain::reference::ReferenceData;
pub use finder::handler::FindServiceHandler;
pub use utils::error::{FinderError, Result};
