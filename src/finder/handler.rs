use crate::domain::ports::ProviderStore;
use crate::domain::reference::ReferenceData;
use crate::finder::dialog::{
    close, close_with_cards, delegate, elicit_slot, DialogResponse, FulfillmentState,
    InvocationSource, LexEvent, Message,
};
use crate::finder::format::format_results;
use crate::finder::normalize::SlotNormalizer;
use crate::finder::query::{find_providers, SearchCriteria};
use crate::finder::validate::validate_find_service;
use crate::utils::error::{FinderError, Result};
use std::sync::Arc;

pub const FIND_SERVICE_INTENT: &str = "FindService";
pub const HT_HOTLINE: &str = "1-888-373-7888 ( TTY: 711)";

/// Routes dialog code hook events for the `FindService` intent.
pub struct FindServiceHandler<S: ProviderStore> {
    store: S,
    reference: Arc<ReferenceData>,
}

impl<S: ProviderStore> FindServiceHandler<S> {
    pub fn new(store: S, reference: Arc<ReferenceData>) -> Self {
        Self { store, reference }
    }

    pub async fn dispatch(&self, event: LexEvent) -> Result<DialogResponse> {
        tracing::debug!(
            "dispatch userId={}, intentName={}",
            event.user_id,
            event.current_intent.name
        );
        if let Some(bot) = &event.bot {
            tracing::debug!("event.bot.name={}", bot.name);
        }

        if event.current_intent.name == FIND_SERVICE_INTENT {
            tracing::debug!("{} was called", FIND_SERVICE_INTENT);
            return self.find_service(event).await;
        }

        Err(FinderError::UnsupportedIntent {
            name: event.current_intent.name,
        })
    }

    async fn find_service(&self, event: LexEvent) -> Result<DialogResponse> {
        match event.source()? {
            InvocationSource::DialogCodeHook => Ok(self.validate_turn(event)),
            InvocationSource::FulfillmentCodeHook => self.fulfill(event).await,
        }
    }

    // 驗證輸入的 slot，第一個錯誤的 slot 清空後重新詢問
    fn validate_turn(&self, event: LexEvent) -> DialogResponse {
        let LexEvent {
            session_attributes,
            current_intent,
            ..
        } = event;
        let mut slots = current_intent.slots;

        let result = validate_find_service(&self.reference, &slots);
        match (result.violated_slot, result.message) {
            (Some(violated), Some(message)) if !result.is_valid => {
                tracing::info!("Re-prompting for slot {}", violated);
                slots.clear(violated);
                elicit_slot(
                    session_attributes,
                    current_intent.name,
                    slots,
                    violated,
                    message,
                )
            }
            _ => delegate(session_attributes, slots),
        }
    }

    async fn fulfill(&self, event: LexEvent) -> Result<DialogResponse> {
        let normalizer = SlotNormalizer::new(&self.reference);
        let slots = &event.current_intent.slots;

        let criteria = SearchCriteria::from_slots(&normalizer, slots)?;
        let records = find_providers(&self.store, &criteria).await?;

        let place = normalizer.display_location(slots.location.as_deref().unwrap_or_default());

        let response = match format_results(&records) {
            Some(cards) => {
                tracing::info!("✅ Found {} providers in {}", records.len(), place);
                close_with_cards(
                    event.session_attributes,
                    FulfillmentState::Fulfilled,
                    Message::plain_text(format!("Here are some service providers in {}.", place)),
                    cards,
                )
            }
            None => {
                tracing::info!("No providers found in {}", place);
                close(
                    event.session_attributes,
                    FulfillmentState::Fulfilled,
                    Message::plain_text(format!(
                        "I was not able to find any support services in {}, you call the human trafficking hotline for help. Call {}",
                        place, HT_HOTLINE
                    )),
                )
            }
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory_store::InMemoryStore;
    use crate::domain::model::{ProviderRecord, SlotName, SlotSet};
    use crate::finder::dialog::{CurrentIntent, DialogAction};

    fn event(source: &str, intent: &str, slots: SlotSet) -> LexEvent {
        LexEvent {
            invocation_source: source.to_string(),
            current_intent: CurrentIntent {
                name: intent.to_string(),
                slots,
            },
            session_attributes: None,
            user_id: "tester".to_string(),
            bot: None,
        }
    }

    fn handler(records: Vec<ProviderRecord>) -> FindServiceHandler<InMemoryStore> {
        FindServiceHandler::new(
            InMemoryStore::with_records(records),
            Arc::new(ReferenceData::bundled().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_unsupported_intent_fails() {
        let result = handler(vec![])
            .dispatch(event("DialogCodeHook", "OrderPizza", SlotSet::default()))
            .await;
        assert!(matches!(result, Err(FinderError::UnsupportedIntent { ref name }) if name == "OrderPizza"));
    }

    #[tokio::test]
    async fn test_dialog_hook_resets_violated_slot() {
        let slots = SlotSet {
            age: Some("elderly".to_string()),
            location: Some("CA".to_string()),
            ..Default::default()
        };
        let response = handler(vec![])
            .dispatch(event("DialogCodeHook", "FindService", slots))
            .await
            .unwrap();

        match response.dialog_action {
            DialogAction::ElicitSlot {
                intent_name,
                slots,
                slot_to_elicit,
                message,
            } => {
                assert_eq!(intent_name, "FindService");
                assert_eq!(slot_to_elicit, SlotName::Age);
                assert_eq!(slots.age, None);
                assert_eq!(slots.location.as_deref(), Some("CA"));
                assert!(message.content.contains("elderly"));
            }
            other => panic!("expected ElicitSlot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dialog_hook_delegates_valid_slots() {
        let slots = SlotSet {
            service: Some("1".to_string()),
            location: Some("Texas".to_string()),
            ..Default::default()
        };
        let response = handler(vec![])
            .dispatch(event("DialogCodeHook", "FindService", slots.clone()))
            .await
            .unwrap();
        assert_eq!(response.dialog_action, DialogAction::Delegate { slots });
    }

    #[tokio::test]
    async fn test_fulfillment_without_location_is_error() {
        let slots = SlotSet {
            service: Some("1".to_string()),
            gender: Some("female".to_string()),
            age: Some("adult".to_string()),
            ..Default::default()
        };
        let result = handler(vec![])
            .dispatch(event("FulfillmentCodeHook", "FindService", slots))
            .await;
        assert!(matches!(result, Err(FinderError::MissingSlot { .. })));
    }
}
