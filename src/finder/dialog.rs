//! Wire types for the dialog platform (Lex V1 code hook events) and the three
//! dialog actions returned to it.

use crate::domain::model::{null_as_default, Card, SlotName, SlotSet};
use crate::utils::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type SessionAttributes = Option<HashMap<String, String>>;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    pub invocation_source: String,
    pub current_intent: CurrentIntent,
    #[serde(default)]
    pub session_attributes: SessionAttributes,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub bot: Option<Bot>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrentIntent {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slots: SlotSet,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Bot {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationSource {
    DialogCodeHook,
    FulfillmentCodeHook,
}

impl LexEvent {
    pub fn source(&self) -> Result<InvocationSource> {
        match self.invocation_source.as_str() {
            "DialogCodeHook" => Ok(InvocationSource::DialogCodeHook),
            "FulfillmentCodeHook" => Ok(InvocationSource::FulfillmentCodeHook),
            other => Err(FinderError::UnsupportedInvocationSource {
                invocation_source: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: String,
    pub content: String,
}

impl Message {
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self {
            content_type: "PlainText".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCard {
    pub content_type: String,
    pub version: u32,
    pub generic_attachments: Vec<Card>,
}

impl ResponseCard {
    pub fn generic(cards: Vec<Card>) -> Self {
        Self {
            content_type: "application/vnd.amazonaws.card.generic".to_string(),
            version: 1,
            generic_attachments: cards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    Fulfilled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DialogAction {
    #[serde(rename_all = "camelCase")]
    ElicitSlot {
        intent_name: String,
        slots: SlotSet,
        slot_to_elicit: SlotName,
        message: Message,
    },
    Delegate {
        slots: SlotSet,
    },
    #[serde(rename_all = "camelCase")]
    Close {
        fulfillment_state: FulfillmentState,
        message: Message,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response_card: Option<ResponseCard>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResponse {
    pub session_attributes: SessionAttributes,
    pub dialog_action: DialogAction,
}

pub fn elicit_slot(
    session_attributes: SessionAttributes,
    intent_name: impl Into<String>,
    slots: SlotSet,
    slot_to_elicit: SlotName,
    message: Message,
) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::ElicitSlot {
            intent_name: intent_name.into(),
            slots,
            slot_to_elicit,
            message,
        },
    }
}

pub fn delegate(session_attributes: SessionAttributes, slots: SlotSet) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::Delegate { slots },
    }
}

pub fn close(
    session_attributes: SessionAttributes,
    fulfillment_state: FulfillmentState,
    message: Message,
) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::Close {
            fulfillment_state,
            message,
            response_card: None,
        },
    }
}

pub fn close_with_cards(
    session_attributes: SessionAttributes,
    fulfillment_state: FulfillmentState,
    message: Message,
    cards: Vec<Card>,
) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::Close {
            fulfillment_state,
            message,
            response_card: Some(ResponseCard::generic(cards)),
        },
    }
}
