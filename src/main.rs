use dataset_translation::config::{cli, InputFormat, RunConfig};
use dataset_translation::io::{load_dataset, save_dataset};
use dataset_translation::mt::build_translator;
use dataset_translation::platform::{PlatformClient, PlatformEndpoints};
use dataset_translation::translation::{DatasetTranslation, RunSummary};
use dataset_translation::RunResult;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = cli().get_matches();
    let config = RunConfig::from_matches(&matches)?;

    let summary = run(&config).await?;
    info!(
        intents = summary.intents,
        translated = summary.expressions_translated,
        skipped = summary.expressions_skipped,
        "Done"
    );
    Ok(())
}

async fn run(config: &RunConfig) -> RunResult<RunSummary> {
    // Unsupported pairs and missing credentials fail here, before any request
    let translator = build_translator(
        config.api,
        config.languages.clone(),
        config.hub_credentials.clone(),
    )?;

    let mut dataset = load_dataset(&config.path, config.format, &config.languages.source)?;
    if config.format == InputFormat::Canonical && dataset.language != config.languages.source {
        warn!(
            dataset = %dataset.language,
            source = %config.languages.source,
            "Dataset language differs from the source language"
        );
    }

    let platform = PlatformClient::connect(&config.platform, &PlatformEndpoints::default()).await?;
    info!(entities = platform.entities().len(), "Connected to the bot platform");

    let run = DatasetTranslation::new(translator, Arc::new(platform))
        .with_batch_size(config.batch_size);
    let summary = run.translate(&mut dataset).await?;

    if config.save {
        save_dataset(&config.output_path(), &dataset)?;
    }
    Ok(summary)
}
