//! Static lookup tables for the finder: the service taxonomy and the US state
//! taxonomy. Both are loaded once per process and never mutated afterwards.

use crate::domain::model::{ServiceTaxonomyEntry, StateTaxonomyEntry};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FinderError, Result};
use std::collections::HashSet;
use std::path::Path;

const BUNDLED_SERVICES: &str = include_str!("../../data/services.json");
const BUNDLED_STATES: &str = include_str!("../../data/us_states.json");

#[derive(Debug, Clone)]
pub struct ReferenceData {
    services: Vec<ServiceTaxonomyEntry>,
    states: Vec<StateTaxonomyEntry>,
}

impl ReferenceData {
    /// Builds the tables, lowercasing state entries and rejecting duplicates.
    pub fn new(
        services: Vec<ServiceTaxonomyEntry>,
        states: Vec<StateTaxonomyEntry>,
    ) -> Result<Self> {
        let mut ids = HashSet::new();
        for service in &services {
            if !ids.insert(service.id.as_str()) {
                return Err(FinderError::ConfigError {
                    message: format!("Duplicate service taxonomy id: {}", service.id),
                });
            }
        }

        let states: Vec<StateTaxonomyEntry> = states
            .into_iter()
            .map(|s| StateTaxonomyEntry {
                name: s.name.to_lowercase(),
                abbreviation: s.abbreviation.to_lowercase(),
            })
            .collect();

        let mut names = HashSet::new();
        let mut abbreviations = HashSet::new();
        for state in &states {
            if !names.insert(state.name.as_str()) {
                return Err(FinderError::ConfigError {
                    message: format!("Duplicate state name: {}", state.name),
                });
            }
            if !abbreviations.insert(state.abbreviation.as_str()) {
                return Err(FinderError::ConfigError {
                    message: format!("Duplicate state abbreviation: {}", state.abbreviation),
                });
            }
        }

        Ok(Self { services, states })
    }

    pub fn from_json(services_json: &str, states_json: &str) -> Result<Self> {
        let services: Vec<ServiceTaxonomyEntry> = serde_json::from_str(services_json)?;
        let states: Vec<StateTaxonomyEntry> = serde_json::from_str(states_json)?;
        Self::new(services, states)
    }

    /// 編譯時內嵌的預設資料
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SERVICES, BUNDLED_STATES)
    }

    /// 從檔案載入；沒給路徑的表改用內嵌資料
    pub fn load(services_path: Option<&str>, states_path: Option<&str>) -> Result<Self> {
        let services_json = match services_path {
            Some(path) => read_table(path)?,
            None => BUNDLED_SERVICES.to_string(),
        };
        let states_json = match states_path {
            Some(path) => read_table(path)?,
            None => BUNDLED_STATES.to_string(),
        };

        let reference = Self::from_json(&services_json, &states_json)?;
        tracing::info!(
            "📚 Loaded reference data: {} services, {} states",
            reference.services.len(),
            reference.states.len()
        );
        Ok(reference)
    }

    /// Loads the tables named by the configuration, falling back to the bundled copies.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::load(config.services_path(), config.states_path())
    }

    pub fn services(&self) -> &[ServiceTaxonomyEntry] {
        &self.services
    }

    pub fn states(&self) -> &[StateTaxonomyEntry] {
        &self.states
    }

    pub fn service_by_id(&self, id: &str) -> Option<&ServiceTaxonomyEntry> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Ids match exactly, names case-insensitively.
    pub fn is_known_service(&self, raw: &str) -> bool {
        let lowered = raw.to_lowercase();
        self.services
            .iter()
            .any(|s| s.name == lowered || s.id == raw)
    }

    pub fn state_by_abbreviation(&self, raw: &str) -> Option<&StateTaxonomyEntry> {
        let lowered = raw.to_lowercase();
        self.states.iter().find(|s| s.abbreviation == lowered)
    }

    pub fn state_by_name(&self, raw: &str) -> Option<&StateTaxonomyEntry> {
        let lowered = raw.to_lowercase();
        self.states.iter().find(|s| s.name == lowered)
    }

    pub fn is_known_location(&self, raw: &str) -> bool {
        self.state_by_name(raw).is_some() || self.state_by_abbreviation(raw).is_some()
    }
}

fn read_table(path: &str) -> Result<String> {
    std::fs::read_to_string(Path::new(path)).map_err(|e| FinderError::ConfigError {
        message: format!("Failed to read reference data '{}': {}", path, e),
    })
}
