use std::time::Duration;

use indexer_config::IndexerConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use serde_helpers::deserialize_duration;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ElasticsearchStorageConfig {
    pub url: Url,
    /// Timeout in milliseconds on client calls to Elasticsearch.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Constraint on the version of Elasticsearch.
    pub version_req: String,
    /// Max of concurrent requests during insertion.
    pub insertion_concurrent_requests: usize,
    /// Number of documents per request during insertion.
    pub insertion_chunk_size: usize,
    /// Number of shard copies that must be active before performing indexing
    /// operations.
    pub wait_for_active_shards: u64,
    /// Setup a backoff to wait after a bulk operation fails and retry the
    /// operation, each successive retry waiting twice as long as the
    /// previous one.
    pub bulk_backoff: ElasticsearchStorageBackoffConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ElasticsearchStorageBackoffConfig {
    /// Number of retries after the first failure (set 0 to never retry)
    pub retry: u8,
    /// Waiting time in milliseconds after the first failure
    #[serde(deserialize_with = "deserialize_duration")]
    pub wait: Duration,
}

impl IndexerConfig<'_> for ElasticsearchStorageConfig {
    const ENV_PREFIX: &'static str = "ELASTICSEARCH";

    fn file_sources() -> Vec<&'static str> {
        vec!["elasticsearch.toml"]
    }

    fn root_key() -> Option<&'static str> {
        Some("elasticsearch")
    }
}

#[cfg(test)]
mod tests {
    use indexer_config::IndexerConfig;
    use speculoos::prelude::*;

    use super::ElasticsearchStorageConfig;

    #[test]
    fn should_load_defaults_with_url_override() -> anyhow::Result<()> {
        let url = "url='http://localhost:9999'".to_string();
        let config = ElasticsearchStorageConfig::get(&[url])?;
        assert_that!(config.url.as_str()).is_equal_to("http://localhost:9999/");
        assert_that!(config.insertion_chunk_size).is_greater_than(0);
        Ok(())
    }

    #[test]
    fn should_override_backoff_with_nested_assignment() -> anyhow::Result<()> {
        let config = ElasticsearchStorageConfig::get(&["bulk_backoff.retry=9".to_string()])?;
        assert_that!(config.bulk_backoff.retry).is_equal_to(9);
        Ok(())
    }
}
