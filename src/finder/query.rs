use crate::domain::filter::{ProviderFilter, RecordAttribute};
use crate::domain::model::{ProviderRecord, SlotName, SlotSet};
use crate::domain::ports::ProviderStore;
use crate::finder::normalize::{AgeGroup, Gender, SlotNormalizer};
use crate::utils::error::{FinderError, Result};

/// Every stored provider must carry this population tag to be returned.
pub const SEX_TRAFFICKING_TAG: &str = "Sex Trafficking";

/// Normalized search input: 1 to 3 service labels plus the population and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub services: Vec<String>,
    pub gender: Gender,
    pub age: AgeGroup,
    pub state: String,
}

impl SearchCriteria {
    pub fn new(
        normalizer: &SlotNormalizer<'_>,
        service: &str,
        service_two: Option<&str>,
        service_three: Option<&str>,
        gender: &str,
        age: &str,
        location: &str,
    ) -> Self {
        let services = std::iter::once(service)
            .chain(service_two)
            .chain(service_three)
            .map(|s| normalizer.normalize_service(s))
            .collect();

        Self {
            services,
            gender: Gender::from_slot(gender),
            age: AgeGroup::from_slot(age),
            state: normalizer.normalize_location(location),
        }
    }

    /// Fulfillment requires service, gender, age and location to be filled.
    pub fn from_slots(normalizer: &SlotNormalizer<'_>, slots: &SlotSet) -> Result<Self> {
        let required = |slot: SlotName| {
            slots.get(slot).ok_or_else(|| FinderError::MissingSlot {
                slot: slot.to_string(),
            })
        };

        Ok(Self::new(
            normalizer,
            required(SlotName::Service)?,
            slots.service_two.as_deref(),
            slots.service_three.as_deref(),
            required(SlotName::Gender)?,
            required(SlotName::Age)?,
            required(SlotName::Location)?,
        ))
    }
}

pub fn build_filter(criteria: &SearchCriteria) -> ProviderFilter {
    let filter =
        ProviderFilter::new().contains(RecordAttribute::PopulationsDetail, SEX_TRAFFICKING_TAG);

    let filter = criteria.services.iter().fold(filter, |filter, service| {
        filter.contains(RecordAttribute::ServicesDetail, service.as_str())
    });

    filter
        .contains(RecordAttribute::PopulationsDetail, criteria.gender.label())
        .contains(RecordAttribute::PopulationsDetail, criteria.age.label())
        .equals(RecordAttribute::State, criteria.state.as_str())
}

pub async fn find_providers<S: ProviderStore>(
    store: &S,
    criteria: &SearchCriteria,
) -> Result<Vec<ProviderRecord>> {
    let filter = build_filter(criteria);
    tracing::debug!(
        "Scanning providers: services={:?}, gender={}, age={}, state={}",
        criteria.services,
        criteria.gender.label(),
        criteria.age.label(),
        criteria.state
    );

    let records = store.scan(&filter).await?;
    tracing::debug!("Scan returned {} providers", records.len());
    Ok(records)
}
