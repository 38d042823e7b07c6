#[cfg(feature = "lambda")]
use crate::config::toml_config::{DEFAULT_PROVIDERS_URL, DEFAULT_USER_AGENT};
#[cfg(feature = "lambda")]
use crate::core::{ConfigProvider, ProviderStore};
#[cfg(feature = "lambda")]
use crate::domain::filter::{Condition, ProviderFilter};
#[cfg(feature = "lambda")]
use crate::domain::model::ProviderRecord;
#[cfg(feature = "lambda")]
use crate::utils::error::{FinderError, Result};
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::error::DisplayErrorContext;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::Client as DynamoDbClient;
#[cfg(feature = "lambda")]
use std::collections::{HashMap, HashSet};
#[cfg(feature = "lambda")]
use std::env;
#[cfg(feature = "lambda")]
use std::time::Duration;

#[cfg(feature = "lambda")]
pub const DEFAULT_TABLE_NAME: &str = "HTServiceProviderTable";

// DynamoDB BatchWriteItem 一次最多 25 筆
#[cfg(feature = "lambda")]
const BATCH_WRITE_LIMIT: usize = 25;

// 未處理項目的重送次數上限
#[cfg(feature = "lambda")]
const MAX_RESUBMITS: u32 = 8;

#[cfg(feature = "lambda")]
const RESUBMIT_BASE_DELAY_MS: u64 = 50;

#[cfg(feature = "lambda")]
const RESUBMIT_MAX_DELAY_MS: u64 = 2_000;

/// Exponential backoff before resubmit `attempt` (1-based), capped.
#[cfg(feature = "lambda")]
fn resubmit_delay(attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(16);
    Duration::from_millis((RESUBMIT_BASE_DELAY_MS * factor).min(RESUBMIT_MAX_DELAY_MS))
}

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub providers_url: String,
    pub user_agent: String,
    pub table_name: String,
    pub region: String,
    pub services_path: Option<String>,
    pub states_path: Option<String>,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            providers_url: env::var("PROVIDERS_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDERS_URL.to_string()),
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            table_name: env::var("TABLE_NAME").unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            services_path: env::var("SERVICES_PATH").ok(),
            states_path: env::var("STATES_PATH").ok(),
        })
    }
}

#[cfg(feature = "lambda")]
impl ConfigProvider for LambdaConfig {
    fn providers_url(&self) -> &str {
        &self.providers_url
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn services_path(&self) -> Option<&str> {
        self.services_path.as_deref()
    }

    fn states_path(&self) -> Option<&str> {
        self.states_path.as_deref()
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("providers_url", &self.providers_url)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_table_name("table_name", &self.table_name)?;
        validate_aws_region("region", &self.region)?;
        validate_optional_path("services_path", self.services_path.as_deref())?;
        validate_optional_path("states_path", self.states_path.as_deref())?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "lambda")]
fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    use crate::utils::validation::validate_non_empty_string;

    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(FinderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// DynamoDB 上的 provider table，scan 時把 filter 轉成 FilterExpression
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: DynamoDbClient,
    table_name: String,
}

#[cfg(feature = "lambda")]
impl DynamoDbStore {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

/// FilterExpression plus its placeholder maps. `state` and `name` are
/// reserved words, so every attribute goes through a `#aN` placeholder.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

#[cfg(feature = "lambda")]
pub fn to_filter_expression(filter: &ProviderFilter) -> Option<FilterExpression> {
    if filter.conditions().is_empty() {
        return None;
    }

    let mut names: HashMap<String, String> = HashMap::new();
    let mut values: HashMap<String, AttributeValue> = HashMap::new();
    let mut clauses = Vec::with_capacity(filter.conditions().len());

    for (i, condition) in filter.conditions().iter().enumerate() {
        let attribute = condition.attribute().as_str();
        let name_key = names
            .iter()
            .find(|(_, v)| v.as_str() == attribute)
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| format!("#a{}", names.len()));
        names.insert(name_key.clone(), attribute.to_string());

        let value_key = format!(":v{}", i);
        values.insert(
            value_key.clone(),
            AttributeValue::S(condition.value().to_string()),
        );

        clauses.push(match condition {
            Condition::Contains { .. } => format!("contains({}, {})", name_key, value_key),
            Condition::Equals { .. } => format!("{} = {}", name_key, value_key),
        });
    }

    Some(FilterExpression {
        expression: clauses.join(" AND "),
        names,
        values,
    })
}

#[cfg(feature = "lambda")]
fn to_item(record: &ProviderRecord) -> HashMap<String, AttributeValue> {
    let optional = |value: &Option<String>| match value {
        Some(v) => AttributeValue::S(v.clone()),
        None => AttributeValue::Null(true),
    };

    HashMap::from([
        ("id".to_string(), AttributeValue::S(record.id.clone())),
        ("name".to_string(), AttributeValue::S(record.name.clone())),
        (
            "servicesDetail".to_string(),
            AttributeValue::S(record.services_detail.clone()),
        ),
        (
            "populationsDetail".to_string(),
            AttributeValue::S(record.populations_detail.clone()),
        ),
        ("hotline".to_string(), optional(&record.hotline)),
        ("phone".to_string(), optional(&record.phone)),
        ("website".to_string(), optional(&record.website)),
        ("email".to_string(), optional(&record.email)),
        ("state".to_string(), optional(&record.state)),
        ("city".to_string(), optional(&record.city)),
    ])
}

#[cfg(feature = "lambda")]
fn from_item(item: &HashMap<String, AttributeValue>) -> Option<ProviderRecord> {
    let text = |key: &str| item.get(key).and_then(|v| v.as_s().ok()).cloned();

    Some(ProviderRecord {
        id: text("id")?,
        name: text("name").unwrap_or_default(),
        services_detail: text("servicesDetail").unwrap_or_default(),
        populations_detail: text("populationsDetail").unwrap_or_default(),
        hotline: text("hotline"),
        phone: text("phone"),
        website: text("website"),
        email: text("email"),
        state: text("state"),
        city: text("city"),
    })
}

/// 同一批次內不能有重複的主鍵，保留最後一筆
#[cfg(feature = "lambda")]
fn dedupe_by_id(records: &[ProviderRecord]) -> Vec<&ProviderRecord> {
    let mut seen = HashSet::new();
    let mut unique: Vec<&ProviderRecord> = records
        .iter()
        .rev()
        .filter(|r| seen.insert(r.id.as_str()))
        .collect();
    unique.reverse();
    unique
}

#[cfg(feature = "lambda")]
impl ProviderStore for DynamoDbStore {
    async fn scan(&self, filter: &ProviderFilter) -> Result<Vec<ProviderRecord>> {
        let expression = to_filter_expression(filter);
        let mut request = self.client.scan().table_name(&self.table_name);
        if let Some(expr) = expression {
            request = request
                .filter_expression(expr.expression)
                .set_expression_attribute_names(Some(expr.names))
                .set_expression_attribute_values(Some(expr.values));
        }

        let mut pages = request.into_paginator().send();
        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| FinderError::StoreError {
                message: format!("Failed to scan {}: {}", self.table_name, DisplayErrorContext(e)),
            })?;
            for item in page.items() {
                match from_item(item) {
                    Some(record) => records.push(record),
                    None => tracing::warn!("Skipping item without an id in {}", self.table_name),
                }
            }
        }

        Ok(records)
    }

    async fn put_batch(&self, records: &[ProviderRecord]) -> Result<usize> {
        let unique = dedupe_by_id(records);
        let mut written = 0;

        for chunk in unique.chunks(BATCH_WRITE_LIMIT) {
            let mut requests = Vec::with_capacity(chunk.len());
            for record in chunk {
                tracing::debug!("Putting provider {} ({})", record.id, record.name);
                let put = PutRequest::builder()
                    .set_item(Some(to_item(record)))
                    .build()
                    .map_err(|e| FinderError::StoreError {
                        message: format!("Failed to build put request: {}", e),
                    })?;
                requests.push(WriteRequest::builder().put_request(put).build());
            }

            // 未處理的項目等待後重新送出，直到整批寫完
            let mut pending = HashMap::from([(self.table_name.clone(), requests)]);
            let mut attempt = 0;
            while !pending.is_empty() {
                if attempt > 0 {
                    if attempt > MAX_RESUBMITS {
                        return Err(FinderError::StoreError {
                            message: format!(
                                "{} items still unprocessed in {} after {} resubmits",
                                pending.values().map(Vec::len).sum::<usize>(),
                                self.table_name,
                                MAX_RESUBMITS
                            ),
                        });
                    }
                    tokio::time::sleep(resubmit_delay(attempt)).await;
                }
                attempt += 1;

                let output = self
                    .client
                    .batch_write_item()
                    .set_request_items(Some(pending))
                    .send()
                    .await
                    .map_err(|e| FinderError::StoreError {
                        message: format!(
                            "Failed to write batch to {}: {}",
                            self.table_name,
                            DisplayErrorContext(e)
                        ),
                    })?;

                pending = output
                    .unprocessed_items
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|(_, items)| !items.is_empty())
                    .collect();
                if !pending.is_empty() {
                    tracing::warn!(
                        "Resubmitting {} unprocessed items (attempt {})",
                        pending.values().map(Vec::len).sum::<usize>(),
                        attempt
                    );
                }
            }

            written += chunk.len();
        }

        Ok(written)
    }
}
