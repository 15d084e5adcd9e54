use futures::stream::Stream;
use tracing::{debug, info};

use records::campus::{validate_campuses, Campus};
use records::Document;

use crate::errors::{ElasticClientError, Result};
use crate::model::configuration::IndexConfig;
use crate::model::index::Index;
use crate::model::stats::InsertStats;
use crate::ElasticSearchClient;

/// Field of the alum documents that the campus aliases filter and route on.
///
/// Inserts do not set routing, so documents land on the shard picked by
/// their `_id`; the routed aliases only line up with that on a single-shard
/// index, which is what the default configuration uses.
pub const CAMPUS_FIELD: &str = "campus";

impl ElasticSearchClient {
    /// Idempotently ensures the shared index exists.
    ///
    /// When the index is already there this is a no-op; otherwise it is
    /// created with the configured shards and replicas.
    pub async fn ensure_index(&self, config: &IndexConfig) -> Result<Index> {
        if self.index_exists(&config.name).await? {
            debug!("index '{}' already exists", config.name);
        } else {
            self.create_index(
                &config.name,
                config.number_of_shards,
                config.number_of_replicas,
            )
            .await?;
            info!("created index '{}'", config.name);
        }

        self.find_index(config.name.clone()).await
    }

    /// Idempotently creates one filtered alias per campus over `index`.
    ///
    /// Each alias only sees documents whose campus field holds the campus
    /// name, so the set of aliases partitions the shared index. Aliases that
    /// already exist are left untouched.
    pub async fn ensure_campus_aliases(&self, index: &str, campuses: &[Campus]) -> Result<()> {
        validate_campuses(campuses).map_err(ElasticClientError::InvalidCampusConfig)?;

        let existing = self
            .find_aliases(index)
            .await?
            .remove(index)
            .unwrap_or_default();

        for campus in campuses {
            if existing.iter().any(|alias| alias == campus.alias()) {
                debug!("alias '{}' already exists on '{}'", campus.alias(), index);
                continue;
            }

            self.add_filtered_alias(index, campus.alias(), CAMPUS_FIELD, &campus.name)
                .await?;
            info!("created campus alias '{}' on '{}'", campus.alias(), index);
        }

        Ok(())
    }

    /// Upserts a stream of documents into `index`, using each document's id
    /// as the Elasticsearch `_id` so re-runs overwrite rather than duplicate.
    pub async fn insert_documents<D, S>(&self, index: String, documents: S) -> Result<InsertStats>
    where
        D: Document + Send + Sync + 'static,
        S: Stream<Item = D>,
    {
        let stats = self.insert_documents_in_index(index, documents).await?;
        info!("insertion stats: {:?}", stats);
        Ok(stats)
    }

    /// Makes freshly indexed documents visible to searches and counts.
    pub async fn refresh(&self, index: &str) -> Result<()> {
        self.refresh_index(index.to_string()).await
    }

    /// Counts the documents behind an index or alias.
    pub async fn count(&self, target: &str) -> Result<u64> {
        self.count_documents(target).await
    }

    /// Aliases currently pointing at `index`.
    pub async fn aliases(&self, index: &str) -> Result<Vec<String>> {
        Ok(self
            .find_aliases(index)
            .await?
            .remove(index)
            .unwrap_or_default())
    }
}
