use clap::Parser;
use ht_provider_finder::config::Command;
use ht_provider_finder::finder::dialog::{CurrentIntent, DialogAction, LexEvent};
use ht_provider_finder::finder::handler::FIND_SERVICE_INTENT;
use ht_provider_finder::utils::error::{ErrorSeverity, FinderError};
use ht_provider_finder::utils::{logger, validation::Validate};
use ht_provider_finder::{
    CliConfig, FileConfig, FindServiceHandler, JsonFileStore, ProviderPipeline, ReferenceData,
    ScrapeEngine,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = match cli.resolve() {
        Ok(settings) => run(&cli.command, settings).await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: &Command, settings: FileConfig) -> Result<(), FinderError> {
    settings.validate()?;
    let store = JsonFileStore::new(settings.store.path.clone());

    match command {
        Command::Scrape { .. } => {
            let engine = ScrapeEngine::new(ProviderPipeline::new(store, settings));
            let report = engine.run().await?;
            println!("✅ Scrape completed: {} records written", report.records_written);
            println!("📁 Records saved to: {}", engine.pipeline().store().path().display());
        }
        Command::Find { .. } => {
            let reference = ReferenceData::from_config(&settings)?;
            let handler = FindServiceHandler::new(store, Arc::new(reference));
            let slots = command.slots().unwrap_or_default();

            // 先跑 dialog hook，通過驗證才執行 fulfillment
            let response = handler
                .dispatch(turn("DialogCodeHook", slots))
                .await?;
            let response = match response.dialog_action {
                DialogAction::Delegate { slots } => {
                    handler.dispatch(turn("FulfillmentCodeHook", slots)).await?
                }
                _ => response,
            };

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn turn(source: &str, slots: ht_provider_finder::domain::model::SlotSet) -> LexEvent {
    LexEvent {
        invocation_source: source.to_string(),
        current_intent: CurrentIntent {
            name: FIND_SERVICE_INTENT.to_string(),
            slots,
        },
        session_attributes: None,
        user_id: "cli".to_string(),
        bot: None,
    }
}
