use crate::core::{ConfigProvider, Pipeline, ProviderFeature, ProviderStore, TransformResult};
use crate::domain::model::ProviderRecord;
use crate::utils::error::{FinderError, Result};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde_json::Value;

/// Scrapes the provider directory feed into a [`ProviderStore`].
pub struct ProviderPipeline<S: ProviderStore, C: ConfigProvider> {
    store: S,
    config: C,
    client: Client,
}

impl<S: ProviderStore, C: ConfigProvider> ProviderPipeline<S, C> {
    pub fn new(store: S, config: C) -> Self {
        Self {
            store,
            config,
            client: Client::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait::async_trait]
impl<S: ProviderStore, C: ConfigProvider> Pipeline for ProviderPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ProviderFeature>> {
        let url = self.config.providers_url();
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.config.user_agent())
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(FinderError::UpstreamFetchError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body: Value = response.json().await?;
        features_from_body(body)
    }

    async fn transform(&self, features: Vec<ProviderFeature>) -> Result<TransformResult> {
        let result = flatten_features(&features);
        if result.dropped > 0 {
            tracing::warn!(
                "Dropped {} features without services or populations detail",
                result.dropped
            );
        }
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<usize> {
        tracing::debug!("Writing {} records to the store", result.records.len());
        let written = self.store.put_batch(&result.records).await?;
        tracing::debug!("Store accepted {} records", written);
        Ok(written)
    }
}

/// 目錄資料的 features 放在 `accountsWithGeo` 底下，也接受一般的 FeatureCollection
fn features_from_body(mut body: Value) -> Result<Vec<ProviderFeature>> {
    let pointer = if body.pointer("/accountsWithGeo/features").is_some() {
        "/accountsWithGeo/features"
    } else {
        "/features"
    };
    let features = body
        .pointer_mut(pointer)
        .map(Value::take)
        .ok_or_else(|| FinderError::ProcessingError {
            message: "Response has no accountsWithGeo.features or features array".to_string(),
        })?;

    Ok(serde_json::from_value(features)?)
}

pub fn flatten_features(features: &[ProviderFeature]) -> TransformResult {
    let records: Vec<ProviderRecord> = features.iter().filter_map(flatten_feature).collect();
    TransformResult {
        dropped: features.len() - records.len(),
        records,
    }
}

/// Keeps only features carrying both `servicesDetail` and `populationsDetail`.
pub fn flatten_feature(feature: &ProviderFeature) -> Option<ProviderRecord> {
    let props = &feature.properties;
    let text = |key: &str| props.get(key).and_then(as_text);

    let services_detail = text("servicesDetail")?;
    let populations_detail = text("populationsDetail")?;

    Some(ProviderRecord {
        id: text("id")?,
        name: text("name")?,
        services_detail,
        populations_detail,
        hotline: text("hotline"),
        phone: text("phone"),
        website: text("website").map(|w| format!("http://{}", strip_url(&w))),
        email: text("email"),
        state: text("state"),
        city: text("city"),
    })
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 只留下網域部分，逗號視為誤植的點
pub fn strip_url(url: &str) -> String {
    ["http://", "https://", "www.", "www://", "http//:"]
        .iter()
        .fold(url.to_string(), |acc, prefix| acc.replace(prefix, ""))
        .replace(',', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory_store::InMemoryStore;
    use httpmock::prelude::*;
    use serde_json::json;

    struct MockConfig {
        providers_url: String,
    }

    impl ConfigProvider for MockConfig {
        fn providers_url(&self) -> &str {
            &self.providers_url
        }

        fn user_agent(&self) -> &str {
            "test-agent"
        }

        fn services_path(&self) -> Option<&str> {
            None
        }

        fn states_path(&self) -> Option<&str> {
            None
        }
    }

    fn feature(properties: Value) -> ProviderFeature {
        serde_json::from_value(json!({ "type": "Feature", "properties": properties })).unwrap()
    }

    #[test]
    fn test_strip_url() {
        assert_eq!(strip_url("https://www.example.org"), "example.org");
        assert_eq!(strip_url("http://example,org/help"), "example.org/help");
        assert_eq!(strip_url("www://shelter.org"), "shelter.org");
        assert_eq!(strip_url("http//:shelter.org"), "shelter.org");
    }

    #[test]
    fn test_flatten_feature_copies_optional_fields() {
        let record = flatten_feature(&feature(json!({
            "id": "001A",
            "name": "Safe Harbor",
            "servicesDetail": "Counseling; Legal Services",
            "populationsDetail": "Sex Trafficking; Adult; Female",
            "website": "https://www.safeharbor.org",
            "phone": 5550100,
            "state": "CA"
        })))
        .unwrap();

        assert_eq!(record.id, "001A");
        assert_eq!(record.website.as_deref(), Some("http://safeharbor.org"));
        assert_eq!(record.phone.as_deref(), Some("5550100"));
        assert_eq!(record.state.as_deref(), Some("CA"));
        assert_eq!(record.hotline, None);
        assert_eq!(record.city, None);
    }

    #[test]
    fn test_flatten_drops_features_without_details() {
        let features = vec![
            feature(json!({"id": "1", "name": "A", "servicesDetail": "Counseling"})),
            feature(json!({"id": "2", "name": "B", "populationsDetail": "Sex Trafficking"})),
            feature(json!({"id": "3", "name": "C", "servicesDetail": "Counseling",
                           "populationsDetail": "Sex Trafficking"})),
            feature(json!({"id": "4", "name": "D", "servicesDetail": null,
                           "populationsDetail": "Sex Trafficking"})),
        ];

        let result = flatten_features(&features);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].id, "3");
        assert_eq!(result.dropped, 3);
    }

    #[test]
    fn test_numeric_properties_become_text() {
        let record = flatten_feature(&feature(json!({
            "id": 1017, "name": "N", "servicesDetail": "Counseling",
            "populationsDetail": "Sex Trafficking", "phone": 5550100, "city": true
        })))
        .unwrap();
        assert_eq!(record.id, "1017");
        assert_eq!(record.phone.as_deref(), Some("5550100"));
        assert_eq!(record.city, None);
    }

    #[test]
    fn test_null_properties_feature_is_dropped() {
        let body = json!({
            "accountsWithGeo": {
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": null},
                    {"type": "Feature", "properties": {"id": "7", "name": "G",
                        "servicesDetail": "Counseling", "populationsDetail": "Sex Trafficking"}}
                ]
            }
        });

        let features = features_from_body(body).unwrap();
        assert_eq!(features.len(), 2);

        let result = flatten_features(&features);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].id, "7");
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_features_from_plain_collection() {
        let body = json!({"type": "FeatureCollection", "features": [{"properties": {"id": "1"}}]});
        assert_eq!(features_from_body(body).unwrap().len(), 1);

        let err = features_from_body(json!({"data": []})).unwrap_err();
        assert!(matches!(err, FinderError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn test_extract_sends_user_agent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/providers.geojson")
                .header("user-agent", "test-agent");
            then.status(200).json_body(json!({
                "accountsWithGeo": {
                    "type": "FeatureCollection",
                    "features": [
                        {"type": "Feature", "properties": {"id": "1", "name": "A"}},
                        {"type": "Feature", "properties": {"id": "2", "name": "B"}}
                    ]
                }
            }));
        });

        let config = MockConfig {
            providers_url: server.url("/providers.geojson"),
        };
        let pipeline = ProviderPipeline::new(InMemoryStore::new(), config);
        let features = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(features.len(), 2);
    }

    #[tokio::test]
    async fn test_extract_failure_status_is_upstream_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/providers.geojson");
            then.status(503);
        });

        let config = MockConfig {
            providers_url: server.url("/providers.geojson"),
        };
        let pipeline = ProviderPipeline::new(InMemoryStore::new(), config);
        let err = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, FinderError::UpstreamFetchError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_load_writes_every_record() {
        let config = MockConfig {
            providers_url: "http://unused".to_string(),
        };
        let pipeline = ProviderPipeline::new(InMemoryStore::new(), config);
        let result = flatten_features(&[feature(json!({
            "id": "9", "name": "Haven", "servicesDetail": "Transportation",
            "populationsDetail": "Sex Trafficking"
        }))]);

        let written = pipeline.load(result).await.unwrap();
        assert_eq!(written, 1);
        assert!(pipeline.store().get("9").await.is_some());
    }
}
