use elasticsearch::http::headers::HeaderMap;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::http::Method;
use elasticsearch::Elasticsearch;
use semver::{Version, VersionReq};
use serde_json::Value;
use tracing::debug;

use crate::errors::{ElasticClientError, Result};
use crate::settings::ElasticsearchStorageConfig;
use crate::ElasticSearchClient;

impl ElasticSearchClient {
    /// Opens a connection to Elasticsearch and checks that the cluster
    /// version satisfies the configured requirement.
    pub async fn conn(config: ElasticsearchStorageConfig) -> Result<Self> {
        let version_req = VersionReq::parse(&config.version_req)?;

        let pool = SingleNodeConnectionPool::new(config.url.clone());
        let transport = TransportBuilder::new(pool).build()?;

        let response = transport
            .send::<String, String>(
                Method::Get,
                "/",
                HeaderMap::new(),
                None, /* query_string */
                None, /* body */
                Some(config.timeout),
            )
            .await?;

        let json = response.json::<Value>().await?;

        let version_number = json
            .pointer("/version/number")
            .and_then(Value::as_str)
            .ok_or_else(|| ElasticClientError::InvalidJson {
                msg: String::from("expected 'version.number'"),
                json: json.clone(),
            })?;

        let version = Version::parse(version_number)?;
        debug!("connected to elasticsearch {}", version);

        if !version_req.matches(&version) {
            return Err(ElasticClientError::UnsupportedElasticSearchVersion(version));
        }

        Ok(ElasticSearchClient {
            client: Elasticsearch::new(transport),
            config,
        })
    }
}
