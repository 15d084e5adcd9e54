use std::path::PathBuf;

use clap::Parser;
use futures::stream;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use elastic_client::ElasticSearchClient;
use fb_ignore_importer::{Command, CsvError, Opts, Settings};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Settings (configuration or CLI) error: {0}")]
    Settings(#[from] indexer_config::ConfigError),

    #[error("Elasticsearch error: {0}")]
    Elasticsearch(#[from] elastic_client::errors::ElasticClientError),

    #[error("Input error: {0}")]
    Input(#[from] CsvError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let settings = Settings::new(&opts)?;

    match opts.cmd {
        Command::Run { input } => run(input, settings).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn run(input: PathBuf, settings: Settings) -> Result<(), Error> {
    let contacts = fb_ignore_importer::read_ignores(&input)?;
    info!("read {} ignored contacts from {:?}", contacts.len(), input);

    let es = ElasticSearchClient::conn(settings.elasticsearch.clone()).await?;

    let index = es.ensure_index(&settings.index).await?;
    let stats = es
        .insert_documents(index.name.clone(), stream::iter(contacts))
        .await?;
    es.refresh(&index.name).await?;

    info!(
        "fb-ignore load done: {} created, {} updated",
        stats.created, stats.updated
    );

    Ok(())
}
