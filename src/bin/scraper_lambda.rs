use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use ht_provider_finder::core::scrape::ScrapeReport;
use ht_provider_finder::utils::{logger, validation::Validate};
use ht_provider_finder::{DynamoDbStore, LambdaConfig, ProviderPipeline, ScrapeEngine};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub report: ScrapeReport,
}

// 觸發事件 (排程) 的內容不使用
async fn function_handler(event: LambdaEvent<serde_json::Value>) -> Result<Response, Error> {
    tracing::info!("Starting scraper Lambda function (request {})", event.context.request_id);

    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_dynamodb::config::Builder::from(&config)
        .region(Region::new(lambda_config.region.clone()))
        .build();
    let store = DynamoDbStore::new(
        DynamoDbClient::from_conf(config),
        lambda_config.table_name.clone(),
    );

    let pipeline = ProviderPipeline::new(store, lambda_config);
    let engine = ScrapeEngine::new(pipeline);
    let report = engine
        .run()
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!("Scraper Lambda function completed successfully");
    Ok(Response {
        message: "Success!".to_string(),
        report,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
