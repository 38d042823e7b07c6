use anyhow::Result;
use ht_provider_finder::domain::filter::{Condition, RecordAttribute};
use ht_provider_finder::domain::model::{
    ProviderRecord, ServiceTaxonomyEntry, SlotName, SlotSet, StateTaxonomyEntry,
};
use ht_provider_finder::domain::ports::ProviderStore;
use ht_provider_finder::finder::dialog::{DialogAction, InvocationSource, LexEvent};
use ht_provider_finder::finder::normalize::SlotNormalizer;
use ht_provider_finder::finder::query::{build_filter, SearchCriteria};
use ht_provider_finder::finder::validate::validate_find_service;
use ht_provider_finder::{FindServiceHandler, InMemoryStore, JsonFileStore, ReferenceData};
use std::sync::Arc;
use tempfile::TempDir;

fn reference() -> ReferenceData {
    ReferenceData::new(
        vec![
            ServiceTaxonomyEntry {
                id: "1".to_string(),
                name: "counseling".to_string(),
            },
            ServiceTaxonomyEntry {
                id: "2".to_string(),
                name: "legal services".to_string(),
            },
        ],
        vec![
            StateTaxonomyEntry {
                name: "california".to_string(),
                abbreviation: "ca".to_string(),
            },
            StateTaxonomyEntry {
                name: "oregon".to_string(),
                abbreviation: "or".to_string(),
            },
        ],
    )
    .unwrap()
}

fn provider(id: &str, name: &str, services: &str, populations: &str, state: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: name.to_string(),
        services_detail: services.to_string(),
        populations_detail: populations.to_string(),
        hotline: None,
        phone: Some("555-0100".to_string()),
        website: Some("http://example.org".to_string()),
        email: None,
        state: Some(state.to_string()),
        city: None,
    }
}

fn lex_event(source: &str, slots: serde_json::Value) -> LexEvent {
    serde_json::from_value(serde_json::json!({
        "invocationSource": source,
        "userId": "integration-user",
        "sessionAttributes": {"lang": "en"},
        "bot": {"name": "HTServiceFinder"},
        "currentIntent": {"name": "FindService", "slots": slots}
    }))
    .unwrap()
}

fn fulfillment_slots() -> serde_json::Value {
    serde_json::json!({
        "Service": "1",
        "Service_two": null,
        "Service_three": null,
        "Gender": "Female",
        "Age": "Adult",
        "Location": "CA"
    })
}

/// 範例 1：服務代碼 "1" 對應 Counseling，兩筆符合的資料回傳兩張卡片
#[tokio::test]
async fn test_fulfillment_returns_matching_cards() -> Result<()> {
    let reference = reference();
    let normalizer = SlotNormalizer::new(&reference);
    let event = lex_event("FulfillmentCodeHook", fulfillment_slots());

    let criteria = SearchCriteria::from_slots(&normalizer, &event.current_intent.slots)?;
    let filter = build_filter(&criteria);
    assert!(filter.conditions().contains(&Condition::Contains {
        attribute: RecordAttribute::ServicesDetail,
        value: "Counseling".to_string()
    }));
    assert!(filter.conditions().contains(&Condition::Equals {
        attribute: RecordAttribute::State,
        value: "CA".to_string()
    }));

    let store = InMemoryStore::with_records(vec![
        provider("a", "Bay Area Haven", "Counseling, Legal Services", "Sex Trafficking, Female, Adult", "CA"),
        provider("b", "Labor Rights Center", "Counseling", "Labor Trafficking, Female, Adult", "CA"),
        provider("c", "Golden State Refuge", "Case Management, Counseling", "Adult, Female, Sex Trafficking", "CA"),
        provider("d", "Portland Safe House", "Counseling", "Sex Trafficking, Female, Adult", "OR"),
    ]);
    let handler = FindServiceHandler::new(store, Arc::new(reference.clone()));

    assert_eq!(event.source()?, InvocationSource::FulfillmentCodeHook);
    let response = handler.dispatch(event).await?;

    assert_eq!(
        response.session_attributes.as_ref().and_then(|s| s.get("lang")).map(String::as_str),
        Some("en")
    );
    match response.dialog_action {
        DialogAction::Close {
            message,
            response_card,
            ..
        } => {
            assert_eq!(message.content, "Here are some service providers in california.");
            let card = response_card.expect("cards for matching providers");
            assert_eq!(card.generic_attachments.len(), 2);
            assert_eq!(card.generic_attachments[0].title, "Bay Area Haven");
            assert_eq!(card.generic_attachments[1].title, "Golden State Refuge");
            assert_eq!(card.generic_attachments[0].sub_title, "Phone: 555-0100");
        }
        other => panic!("expected Close, got {:?}", other),
    }
    Ok(())
}

/// 範例 2：無法辨識的性別
#[tokio::test]
async fn test_unrecognised_gender_is_reported_first() -> Result<()> {
    let reference = reference();
    let slots: SlotSet = serde_json::from_value(serde_json::json!({
        "Service": "astrology",
        "Gender": "other",
        "Age": "Adult",
        "Location": "Atlantis"
    }))?;

    let result = validate_find_service(&reference, &slots);
    assert!(!result.is_valid);
    assert_eq!(result.violated_slot, Some(SlotName::Gender));
    assert!(result.message.as_ref().unwrap().content.contains("other"));

    let value = serde_json::to_value(&result)?;
    assert_eq!(value["isValid"], false);
    assert_eq!(value["violatedSlot"], "Gender");
    assert_eq!(value["message"]["contentType"], "PlainText");
    Ok(())
}

/// 範例 3：沒有資料時回傳熱線訊息，不附卡片
#[tokio::test]
async fn test_no_matches_falls_back_to_hotline() -> Result<()> {
    let handler = FindServiceHandler::new(
        InMemoryStore::with_records(vec![provider(
            "d",
            "Portland Safe House",
            "Counseling",
            "Sex Trafficking, Female, Adult",
            "OR",
        )]),
        Arc::new(reference()),
    );

    let response = handler
        .dispatch(lex_event("FulfillmentCodeHook", fulfillment_slots()))
        .await?;
    let value = serde_json::to_value(&response)?;

    assert_eq!(value["dialogAction"]["type"], "Close");
    assert_eq!(value["dialogAction"]["fulfillmentState"], "Fulfilled");
    let content = value["dialogAction"]["message"]["content"].as_str().unwrap();
    assert!(content.contains("1-888-373-7888 ( TTY: 711)"));
    assert!(content.contains("california"));
    assert!(value["dialogAction"].get("responseCard").is_none());
    Ok(())
}

#[tokio::test]
async fn test_dialog_hook_elicits_second_service() -> Result<()> {
    let handler = FindServiceHandler::new(InMemoryStore::new(), Arc::new(reference()));
    let event = lex_event(
        "DialogCodeHook",
        serde_json::json!({
            "Service": "counseling",
            "Service_two": "juggling",
            "Service_three": null,
            "Gender": "male",
            "Age": "minor",
            "Location": "Oregon"
        }),
    );

    let value = serde_json::to_value(handler.dispatch(event).await?)?;
    let action = &value["dialogAction"];
    assert_eq!(action["type"], "ElicitSlot");
    assert_eq!(action["slotToElicit"], "Service_two");
    assert!(action["slots"]["Service_two"].is_null());
    assert_eq!(action["slots"]["Service"], "counseling");
    assert!(action["message"]["content"]
        .as_str()
        .unwrap()
        .contains("juggling"));
    Ok(())
}

#[tokio::test]
async fn test_fifteen_matches_yield_ten_cards() -> Result<()> {
    let records: Vec<ProviderRecord> = (0..15)
        .map(|i| {
            provider(
                &i.to_string(),
                &format!("Provider {:02}", i),
                "Counseling",
                "Sex Trafficking, Female, Adult",
                "CA",
            )
        })
        .collect();

    // JSON 檔案 store 保留寫入順序
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("providers.json"));
    store.put_batch(&records).await?;

    let handler = FindServiceHandler::new(store, Arc::new(reference()));
    let response = handler
        .dispatch(lex_event("FulfillmentCodeHook", fulfillment_slots()))
        .await?;

    match response.dialog_action {
        DialogAction::Close { response_card, .. } => {
            let cards = response_card.unwrap().generic_attachments;
            assert_eq!(cards.len(), 10);
            let titles: Vec<String> = cards.into_iter().map(|c| c.title).collect();
            let expected: Vec<String> = (0..10).map(|i| format!("Provider {:02}", i)).collect();
            assert_eq!(titles, expected);
        }
        other => panic!("expected Close, got {:?}", other),
    }
    Ok(())
}
