use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 儲存在 record store 中的服務提供者，以 `id` 為主鍵
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    pub services_detail: String,
    pub populations_detail: String,
    pub hotline: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTaxonomyEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxonomyEntry {
    pub name: String,
    pub abbreviation: String,
}

/// Slot names in the order the validator checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotName {
    Gender,
    Age,
    Location,
    Service,
    #[serde(rename = "Service_two")]
    ServiceTwo,
    #[serde(rename = "Service_three")]
    ServiceThree,
}

impl SlotName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::Gender => "Gender",
            SlotName::Age => "Age",
            SlotName::Location => "Location",
            SlotName::Service => "Service",
            SlotName::ServiceTwo => "Service_two",
            SlotName::ServiceThree => "Service_three",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 單輪對話的 slot 值；沒填的 slot 序列化成 null，Lex 需要完整的 key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSet {
    #[serde(rename = "Service", default)]
    pub service: Option<String>,
    #[serde(rename = "Service_two", default)]
    pub service_two: Option<String>,
    #[serde(rename = "Service_three", default)]
    pub service_three: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Age", default)]
    pub age: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
}

impl SlotSet {
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        match slot {
            SlotName::Gender => self.gender.as_deref(),
            SlotName::Age => self.age.as_deref(),
            SlotName::Location => self.location.as_deref(),
            SlotName::Service => self.service.as_deref(),
            SlotName::ServiceTwo => self.service_two.as_deref(),
            SlotName::ServiceThree => self.service_three.as_deref(),
        }
    }

    /// Resets a slot to absent so the dialog platform prompts for it again.
    pub fn clear(&mut self, slot: SlotName) {
        let field = match slot {
            SlotName::Gender => &mut self.gender,
            SlotName::Age => &mut self.age,
            SlotName::Location => &mut self.location,
            SlotName::Service => &mut self.service,
            SlotName::ServiceTwo => &mut self.service_two,
            SlotName::ServiceThree => &mut self.service_three,
        };
        *field = None;
    }
}

/// One provider summary inside a generic response card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub sub_title: String,
    pub attachment_link_url: Option<String>,
}

/// 欄位缺少或為 `null` 時都使用預設值
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 上游 GeoJSON 中的一個 feature，只保留 properties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderFeature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<ProviderRecord>,
    pub dropped: usize,
}
