use elasticsearch::Elasticsearch;

use crate::settings::ElasticsearchStorageConfig;

pub mod dto;
pub mod errors;
pub mod future_helper;
pub mod model;
pub mod remote;
pub mod settings;
pub mod status;
pub mod storage;

mod internal;

#[derive(Clone, Debug)]
pub struct ElasticSearchClient {
    /// Elasticsearch client
    pub client: Elasticsearch,
    /// Client configuration
    pub config: ElasticsearchStorageConfig,
}
