use crate::domain::model::{SlotName, SlotSet};
use crate::domain::reference::ReferenceData;
use crate::finder::dialog::Message;
use serde::Serialize;

const GENDER_TYPES: [&str; 2] = ["male", "female"];
const AGE_TYPES: [&str; 2] = ["minor", "adult"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violated_slot: Option<SlotName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            violated_slot: None,
            message: None,
        }
    }

    pub fn invalid(slot: SlotName, content: String) -> Self {
        Self {
            is_valid: false,
            violated_slot: Some(slot),
            message: Some(Message::plain_text(content)),
        }
    }
}

/// Checks optional slots in the order gender, age, location, service,
/// service_two, service_three and reports the first violation.
pub fn validate_find_service(reference: &ReferenceData, slots: &SlotSet) -> ValidationResult {
    if let Some(gender) = slots.gender.as_deref() {
        if !GENDER_TYPES.contains(&gender.to_lowercase().as_str()) {
            return ValidationResult::invalid(
                SlotName::Gender,
                format!(
                    "Sorry I could not recognise {}, you can enter male or female.",
                    gender
                ),
            );
        }
    }

    if let Some(age) = slots.age.as_deref() {
        if !AGE_TYPES.contains(&age.to_lowercase().as_str()) {
            return ValidationResult::invalid(
                SlotName::Age,
                format!(
                    "Sorry I could not recognise {}, please select one of the options below.",
                    age
                ),
            );
        }
    }

    if let Some(location) = slots.location.as_deref() {
        if !reference.is_known_location(location) {
            return ValidationResult::invalid(
                SlotName::Location,
                format!(
                    "Sorry I could not recognise {}, please enter the U.S state you are located in (e.g. California or CA)",
                    location
                ),
            );
        }
    }

    for slot in [SlotName::Service, SlotName::ServiceTwo, SlotName::ServiceThree] {
        if let Some(service) = slots.get(slot) {
            if !reference.is_known_service(service) {
                return ValidationResult::invalid(
                    slot,
                    format!(
                        "Sorry I could not understand {}, enter 'Help' to see a list of services I can find.",
                        service
                    ),
                );
            }
        }
    }

    ValidationResult::valid()
}
