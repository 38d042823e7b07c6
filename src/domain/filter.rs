//! Store-independent conjunctive predicate over [`ProviderRecord`]s.

use crate::domain::model::ProviderRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAttribute {
    ServicesDetail,
    PopulationsDetail,
    State,
}

impl RecordAttribute {
    /// Attribute name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordAttribute::ServicesDetail => "servicesDetail",
            RecordAttribute::PopulationsDetail => "populationsDetail",
            RecordAttribute::State => "state",
        }
    }

    fn value_of<'a>(&self, record: &'a ProviderRecord) -> Option<&'a str> {
        match self {
            RecordAttribute::ServicesDetail => Some(record.services_detail.as_str()),
            RecordAttribute::PopulationsDetail => Some(record.populations_detail.as_str()),
            RecordAttribute::State => record.state.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Substring containment on a text attribute.
    Contains {
        attribute: RecordAttribute,
        value: String,
    },
    Equals {
        attribute: RecordAttribute,
        value: String,
    },
}

impl Condition {
    pub fn attribute(&self) -> RecordAttribute {
        match self {
            Condition::Contains { attribute, .. } | Condition::Equals { attribute, .. } => {
                *attribute
            }
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Condition::Contains { value, .. } | Condition::Equals { value, .. } => value,
        }
    }

    pub fn matches(&self, record: &ProviderRecord) -> bool {
        let actual = self.attribute().value_of(record);
        match self {
            Condition::Contains { value, .. } => actual.is_some_and(|a| a.contains(value.as_str())),
            Condition::Equals { value, .. } => actual == Some(value.as_str()),
        }
    }
}

/// All conditions must hold (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderFilter {
    conditions: Vec<Condition>,
}

impl ProviderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(mut self, attribute: RecordAttribute, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Contains {
            attribute,
            value: value.into(),
        });
        self
    }

    pub fn equals(mut self, attribute: RecordAttribute, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Equals {
            attribute,
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, record: &ProviderRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}
