use elasticsearch::http::response::Exception;
use semver::Version;
use serde_json::Value;
use thiserror::Error;

use crate::dto::ElasticsearchBulkError;

pub type Result<T> = std::result::Result<T, ElasticClientError>;

#[derive(Debug, Error)]
pub enum ElasticClientError {
    #[error("Elasticsearch error: {0}")]
    ElasticSearchError(#[from] elasticsearch::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Invalid json format: {msg} {json}")]
    InvalidJson { msg: String, json: Value },

    #[error("Failed to create elasticsearch index '{0}'")]
    IndexCreationFailed(String),

    #[error("Failed to update elasticsearch alias '{0}'")]
    AliasUpdateFailed(String),

    #[error("Invalid campus configuration: {0}")]
    InvalidCampusConfig(String),

    #[error("Object id {object_id}, error: {inner}")]
    BulkObjectCreationFailed {
        object_id: String,
        inner: ElasticsearchBulkError,
    },

    #[error("Elasticsearch health status unknown '{0}'")]
    UnknownElasticSearchStatus(String),

    #[error("Elasticsearch index not found '{0}'")]
    IndexNotFound(String),

    #[error("Elasticsearch exception: status: {status:?}, error: {error:?}")]
    ElasticSearchHttpError {
        error: elasticsearch::http::response::Error,
        status: Option<u16>,
    },

    #[error("No response from elastic search despite the lack of exception")]
    ElasticsearchFailureWithoutException,

    #[error("Elasticsearch version {0}, is not supported")]
    UnsupportedElasticSearchVersion(Version),

    #[error("Semver parse error: {0}")]
    SemVerError(#[from] semver::Error),

    #[error("Elasticsearch client builder error: {0}")]
    ElasticClientBuilderError(#[from] elasticsearch::http::transport::BuildError),
}

impl From<Exception> for ElasticClientError {
    fn from(exception: Exception) -> Self {
        Self::ElasticSearchHttpError {
            error: exception.error().clone(),
            status: exception.status(),
        }
    }
}
