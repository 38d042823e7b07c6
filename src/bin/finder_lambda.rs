use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use ht_provider_finder::finder::dialog::{DialogResponse, LexEvent};
use ht_provider_finder::utils::{logger, validation::Validate};
use ht_provider_finder::{DynamoDbStore, FindServiceHandler, LambdaConfig, ReferenceData};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

async fn function_handler(
    handler: &FindServiceHandler<DynamoDbStore>,
    event: LambdaEvent<LexEvent>,
) -> Result<DialogResponse, Error> {
    let response = handler
        .dispatch(event.payload)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    // 參考資料只在冷啟動時載入一次
    let reference = Arc::new(ReferenceData::from_config(&lambda_config)?);

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_dynamodb::config::Builder::from(&config)
        .region(Region::new(lambda_config.region.clone()))
        .build();
    let store = DynamoDbStore::new(
        DynamoDbClient::from_conf(config),
        lambda_config.table_name.clone(),
    );

    let handler = FindServiceHandler::new(store, reference);
    let handler = &handler;
    run(service_fn(move |event: LambdaEvent<LexEvent>| async move {
        function_handler(handler, event).await
    }))
    .await
}
