use clap::Parser;
use futures::stream;
use futures::TryStreamExt;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alumni_importer::{Command, Opts, Settings};
use elastic_client::model::stats::InsertStats;
use elastic_client::ElasticSearchClient;
use records::Campus;
use salesforce_client::contact::{alumni_query, campus_count_query};
use salesforce_client::{ContactRecord, SalesforceClient};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Settings (configuration or CLI) error: {0}")]
    Settings(#[from] indexer_config::ConfigError),

    #[error("Elasticsearch error: {0}")]
    Elasticsearch(#[from] elastic_client::errors::ElasticClientError),

    #[error("Salesforce error: {0}")]
    Salesforce(#[from] salesforce_client::SalesforceClientError),

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
        Command::Run => run(settings).await,
        Command::Counts => counts(settings).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

/// Ensures the shared index and its campus aliases exist, then mirrors every
/// configured campus's alumni from Salesforce.
async fn run(settings: Settings) -> Result<(), Error> {
    let es = ElasticSearchClient::conn(settings.elasticsearch.clone()).await?;
    let status = es.status().await?;
    info!(
        "connected to elasticsearch {} (health: {:?})",
        status.storage.version, status.storage.health
    );

    let sf = SalesforceClient::conn(settings.salesforce.clone()).await?;

    let index = es.ensure_index(&settings.index).await?;
    es.ensure_campus_aliases(&index.name, &settings.campuses)
        .await?;

    let mut totals = InsertStats::default();
    for campus in &settings.campuses {
        let stats = sync_campus(&es, &sf, &settings, campus).await?;
        info!("{:>15}: {} alumni indexed", campus.name, stats.total());
        totals += stats;
    }

    es.refresh(&index.name).await?;
    info!(
        "sync done: {} created, {} updated, {} unchanged",
        totals.created, totals.updated, totals.skipped
    );

    Ok(())
}

async fn sync_campus(
    es: &ElasticSearchClient,
    sf: &SalesforceClient,
    settings: &Settings,
    campus: &Campus,
) -> Result<InsertStats, Error> {
    let soql = alumni_query(&campus.salesforce_account_id, settings.first_class_year);

    let contacts: Vec<ContactRecord> = sf.query_stream(soql).try_collect().await?;
    let alumni = contacts
        .into_iter()
        .map(|contact| contact.into_alum(&campus.name))
        .collect::<Vec<_>>();

    let stats = es
        .insert_documents(settings.index.name.clone(), stream::iter(alumni))
        .await?;

    Ok(stats)
}

/// Prints per-campus alumni counts from Salesforce next to the document
/// counts behind each campus alias.
async fn counts(settings: Settings) -> Result<(), Error> {
    let es = ElasticSearchClient::conn(settings.elasticsearch.clone()).await?;
    let sf = SalesforceClient::conn(settings.salesforce.clone()).await?;

    let mut sf_total = 0;
    let mut es_total = 0;

    for campus in &settings.campuses {
        let sf_count = sf
            .count(&campus_count_query(&campus.salesforce_account_id))
            .await?;
        let es_count = es.count(campus.alias()).await?;

        sf_total += sf_count;
        es_total += es_count;

        println!("{}\n    SF:{:>7}\n    ES:{:>7}", campus.name, sf_count, es_count);
    }

    println!("{}\n", "-".repeat(10));
    println!("total\n    SF:{:>7}\n    ES:{:>7} (alumni)", sf_total, es_total);

    Ok(())
}
