pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::FileConfig;
#[cfg(feature = "cli")]
use crate::domain::model::SlotSet;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ht-provider-finder")]
#[command(about = "Scrape and search human trafficking service providers")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Override the record store file path")]
    pub store: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Download the provider directory into the record store
    Scrape {
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Run one FindService conversation turn against the record store
    Find {
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        service_two: Option<String>,
        #[arg(long)]
        service_three: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取設定檔後套用命令列覆蓋
    pub fn resolve(&self) -> Result<FileConfig> {
        let mut settings = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        if let Some(store) = &self.store {
            settings.store.path = store.clone();
        }
        if let Command::Scrape {
            endpoint: Some(endpoint),
        } = &self.command
        {
            settings.scraper.endpoint = endpoint.clone();
        }

        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl Command {
    pub fn slots(&self) -> Option<SlotSet> {
        match self {
            Command::Find {
                service,
                service_two,
                service_three,
                gender,
                age,
                location,
            } => Some(SlotSet {
                service: service.clone(),
                service_two: service_two.clone(),
                service_three: service_three.clone(),
                gender: gender.clone(),
                age: age.clone(),
                location: location.clone(),
            }),
            Command::Scrape { .. } => None,
        }
    }
}
