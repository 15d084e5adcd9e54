use std::collections::BTreeMap;
use std::convert::TryFrom;

use elasticsearch::cat::CatIndicesParts;
use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::indices::{
    IndicesCreateParts, IndicesExistsParts, IndicesGetAliasParts, IndicesRefreshParts,
};
use elasticsearch::{BulkOperation, BulkParts, CountParts};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use records::Document;

use crate::dto::{ElasticsearchBulkResponse, ElasticsearchCountResponse};
use crate::errors::{ElasticClientError, Result};
use crate::future_helper::with_backoff;
use crate::model::index::{Index, IndexStatus};
use crate::model::stats::InsertStats;
use crate::model::status::{StorageHealth, Version as StorageVersion};
use crate::ElasticSearchClient;

/// The alias body implementing the "faking it" technique: a term filter plus
/// routing restricted to one campus, so that the alias behaves like a
/// separate index over the shared one.
pub(crate) fn filtered_alias_action(index: &str, alias: &str, field: &str, value: &str) -> Value {
    json!({
        "add": {
            "index": index,
            "alias": alias,
            "routing": value,
            "filter": { "term": { field: value } }
        }
    })
}

fn parse_acknowledged(json: &Value) -> Result<bool> {
    json.as_object()
        .ok_or_else(|| ElasticClientError::InvalidJson {
            msg: String::from("expected JSON object"),
            json: json.clone(),
        })?
        .get("acknowledged")
        .ok_or_else(|| ElasticClientError::InvalidJson {
            msg: String::from("expected 'acknowledged'"),
            json: json.clone(),
        })?
        .as_bool()
        .ok_or_else(|| ElasticClientError::InvalidJson {
            msg: String::from("expected JSON bool"),
            json: json.clone(),
        })
}

impl ElasticSearchClient {
    pub(crate) async fn create_index(
        &self,
        index_name: &str,
        number_of_shards: u64,
        number_of_replicas: u64,
    ) -> Result<()> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(json!({
                "settings": {
                    "number_of_shards": number_of_shards,
                    "number_of_replicas": number_of_replicas
                }
            }))
            .request_timeout(self.config.timeout)
            .wait_for_active_shards(&self.config.wait_for_active_shards.to_string())
            .send()
            .await?;

        if response.status_code().is_success() {
            // Response similar to:
            // {"acknowledged": true, "index": "alumni", "shards_acknowledged": true}
            let json = response.json::<Value>().await?;

            if parse_acknowledged(&json)? {
                Ok(())
            } else {
                Err(ElasticClientError::IndexCreationFailed(
                    index_name.to_string(),
                ))
            }
        } else {
            match response.exception().await? {
                Some(exception) => Err(ElasticClientError::from(exception)),
                None => Err(ElasticClientError::ElasticsearchFailureWithoutException),
            }
        }
    }

    pub(crate) async fn index_exists(&self, index: &str) -> Result<bool> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        Ok(response.status_code().is_success())
    }

    pub(crate) async fn find_index(&self, index: String) -> Result<Index> {
        let response = self
            .client
            .cat()
            .indices(CatIndicesParts::Index(&[&index]))
            .request_timeout(self.config.timeout)
            .format("json")
            .send()
            .await?;

        if response.status_code().is_success() {
            let json = response.json::<Value>().await?;

            let mut indices: Vec<ElasticsearchIndex> = serde_json::from_value(json)?;

            indices
                .pop()
                .map(Index::try_from)
                .ok_or(ElasticClientError::IndexNotFound(index))?
        } else {
            match response.exception().await? {
                Some(exception) => Err(ElasticClientError::from(exception)),
                None => Err(ElasticClientError::ElasticsearchFailureWithoutException),
            }
        }
    }

    /// Adds a filtered + routed alias on `index`, making `alias` behave like
    /// an index restricted to documents whose `field` equals `value`.
    pub(crate) async fn add_filtered_alias(
        &self,
        index: &str,
        alias: &str,
        field: &str,
        value: &str,
    ) -> Result<()> {
        let action = filtered_alias_action(index, alias, field, value);

        let response = self
            .client
            .indices()
            .update_aliases()
            .request_timeout(self.config.timeout)
            .body(json!({ "actions": [action] }))
            .send()
            .await
            .and_then(|res| res.error_for_status_code())?;

        let json = response.json::<Value>().await?;

        if parse_acknowledged(&json)? {
            Ok(())
        } else {
            Err(ElasticClientError::AliasUpdateFailed(alias.to_string()))
        }
    }

    /// Returns, for each concrete index matching `index`, the aliases
    /// pointing at it.
    pub(crate) async fn find_aliases(&self, index: &str) -> Result<BTreeMap<String, Vec<String>>> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Index(&[index]))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        if response.status_code().is_success() {
            // Response similar to:
            // { "alumni": { "aliases": { "bulls": {}, "rauner": {} } } }
            let json = response.json::<Value>().await?;

            let aliases = json
                .as_object()
                .map(|indices| {
                    indices
                        .iter()
                        .filter_map(|(index, value)| {
                            value["aliases"]
                                .as_object()
                                .map(|aliases| (index.clone(), aliases.keys().cloned().collect()))
                        })
                        .collect()
                })
                .unwrap_or_else(|| {
                    info!("No alias for index {}", index);
                    BTreeMap::new()
                });
            Ok(aliases)
        } else {
            let err = response
                .exception()
                .await?
                .map(ElasticClientError::from)
                .unwrap_or(ElasticClientError::ElasticsearchFailureWithoutException);

            Err(err)
        }
    }

    pub(crate) async fn insert_documents_in_index<D, S>(
        &self,
        index: String,
        documents: S,
    ) -> Result<InsertStats>
    where
        D: Document + Send + Sync + 'static,
        S: Stream<Item = D>,
    {
        let stats = self
            .bulk(
                index,
                documents.map(|doc| {
                    let doc_id = doc.id();
                    BulkOperation::index(doc).id(doc_id).into()
                }),
            )
            .await?;

        if stats.deleted != 0 {
            warn!("Unexpectedly deleted documents during insertion");
        }

        Ok(stats)
    }

    async fn bulk<D, S>(&self, index: String, documents: S) -> Result<InsertStats>
    where
        D: Serialize + Send + Sync + 'static,
        S: Stream<Item = BulkOperation<D>>,
    {
        let stats = documents
            .chunks(self.config.insertion_chunk_size)
            .map(|chunk| {
                let index = index.clone();
                let client = self.clone();

                async move {
                    tokio::spawn(client.bulk_block(index, chunk))
                        .await
                        .expect("tokio task panicked")
                        .unwrap_or_else(|err| panic!("Error inserting chunk: {}", err))
                }
            })
            .buffer_unordered(self.config.insertion_concurrent_requests)
            .fold(InsertStats::default(), |mut acc, chunk_stats| async move {
                acc += chunk_stats;
                acc
            })
            .await;

        Ok(stats)
    }

    async fn bulk_block<D>(self, index: String, chunk: Vec<BulkOperation<D>>) -> Result<InsertStats>
    where
        D: Serialize + Send + Sync + 'static,
    {
        let mut stats = InsertStats::default();

        let resp = with_backoff(
            || async {
                self.client
                    .bulk(BulkParts::Index(index.as_str()))
                    .request_timeout(self.config.timeout)
                    .body(chunk.iter().collect())
                    .send()
                    .await?
                    .error_for_status_code()
            },
            self.config.bulk_backoff.retry,
            self.config.bulk_backoff.wait,
        )
        .await?;

        if !resp.status_code().is_success() {
            let err = resp
                .exception()
                .await?
                .map(ElasticClientError::from)
                .unwrap_or(ElasticClientError::ElasticsearchFailureWithoutException);

            Err(err)
        } else {
            let es_response: ElasticsearchBulkResponse = resp.json().await?;

            es_response.items.into_iter().try_for_each(|item| {
                let result = item.inner().outcome().map_err(|(object_id, inner)| {
                    ElasticClientError::BulkObjectCreationFailed { object_id, inner }
                })?;

                use crate::dto::ElasticsearchBulkResult;
                match result {
                    ElasticsearchBulkResult::Created => stats.created += 1,
                    ElasticsearchBulkResult::Updated => stats.updated += 1,
                    ElasticsearchBulkResult::Noop => stats.skipped += 1,
                    ElasticsearchBulkResult::Deleted => stats.deleted += 1,
                }

                Ok::<_, ElasticClientError>(())
            })?;

            Ok(stats)
        }
    }

    pub(crate) async fn refresh_index(&self, index: String) -> Result<()> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[&index]))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        if !response.status_code().is_success() {
            let err = response
                .exception()
                .await?
                .map(ElasticClientError::from)
                .unwrap_or(ElasticClientError::ElasticsearchFailureWithoutException);

            Err(err)
        } else {
            Ok(())
        }
    }

    /// Counts documents behind `target`, which can be a concrete index or an
    /// alias (including the filtered campus aliases).
    pub(crate) async fn count_documents(&self, target: &str) -> Result<u64> {
        let response = self
            .client
            .count(CountParts::Index(&[target]))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        if response.status_code().is_success() {
            let body = response.json::<ElasticsearchCountResponse>().await?;
            Ok(body.count)
        } else {
            let err = response
                .exception()
                .await?
                .map(ElasticClientError::from)
                .unwrap_or(ElasticClientError::ElasticsearchFailureWithoutException);

            Err(err)
        }
    }

    pub(crate) async fn cluster_health(&self) -> Result<StorageHealth> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        if response.status_code().is_success() {
            // Response similar to:
            // {"cluster_name": "foo", "status": "yellow", ...}
            let json = response.json::<Value>().await?;

            let health = json
                .as_object()
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("expected JSON object"),
                    json: json.clone(),
                })?
                .get("status")
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("expected 'status'"),
                    json: json.clone(),
                })?
                .as_str()
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("expected JSON string"),
                    json: json.clone(),
                })?;

            StorageHealth::try_from(health)
        } else {
            let err = response
                .exception()
                .await?
                .map(ElasticClientError::from)
                .unwrap_or(ElasticClientError::ElasticsearchFailureWithoutException);

            Err(err)
        }
    }

    pub(crate) async fn cluster_version(&self) -> Result<StorageVersion> {
        // Only the "v" (version) column of the CAT nodes API is of interest.
        let response = self
            .client
            .cat()
            .nodes()
            .request_timeout(self.config.timeout)
            .h(&["v"])
            .format("json")
            .send()
            .await?;

        if response.status_code().is_success() {
            let json = response.json::<Value>().await?;

            let version = json
                .as_array()
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("expected JSON array"),
                    json: json.clone(),
                })?
                .first()
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("empty list of node information"),
                    json: json.clone(),
                })?
                .get("v")
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("expected 'v' (version)"),
                    json: json.clone(),
                })?
                .as_str()
                .ok_or_else(|| ElasticClientError::InvalidJson {
                    msg: String::from("expected JSON string"),
                    json: json.clone(),
                })?;
            Ok(version.to_string())
        } else {
            let err = response
                .exception()
                .await?
                .map(ElasticClientError::from)
                .unwrap_or(ElasticClientError::ElasticsearchFailureWithoutException);

            Err(err)
        }
    }
}

/// The information provided by the Elasticsearch CAT indices API.
#[derive(PartialEq, Debug, Serialize, Deserialize)]
pub(crate) struct ElasticsearchIndex {
    pub(crate) health: String,
    pub(crate) status: String,
    #[serde(rename = "index")]
    pub(crate) name: String,
    #[serde(rename = "docs.count")]
    pub(crate) docs_count: Option<String>,
}

impl TryFrom<ElasticsearchIndex> for Index {
    type Error = ElasticClientError;

    fn try_from(index: ElasticsearchIndex) -> Result<Self> {
        let ElasticsearchIndex {
            name,
            docs_count,
            status,
            ..
        } = index;

        let docs_count = docs_count
            .and_then(|count| count.parse::<u32>().ok())
            .unwrap_or(0);

        Ok(Index {
            name,
            docs_count,
            status: IndexStatus::from(status),
        })
    }
}

impl<'a> TryFrom<&'a str> for StorageHealth {
    type Error = ElasticClientError;

    fn try_from(value: &'a str) -> Result<Self> {
        match value {
            "green" | "yellow" => Ok(StorageHealth::OK),
            "red" => Ok(StorageHealth::FAIL),
            _ => Err(ElasticClientError::UnknownElasticSearchStatus(
                value.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    #[test]
    fn filtered_alias_action_carries_filter_and_routing() {
        let action = filtered_alias_action("alumni", "bulls", "campus", "bulls");

        assert_that!(action["add"]["index"].as_str()).contains_value("alumni");
        assert_that!(action["add"]["alias"].as_str()).contains_value("bulls");
        assert_that!(action["add"]["routing"].as_str()).contains_value("bulls");
        assert_that!(action["add"]["filter"]["term"]["campus"].as_str()).contains_value("bulls");
    }

    #[test]
    fn cat_indices_row_becomes_an_index() {
        let row = ElasticsearchIndex {
            health: "yellow".to_string(),
            status: "open".to_string(),
            name: "alumni".to_string(),
            docs_count: Some("12".to_string()),
        };

        let index = Index::try_from(row).unwrap();
        assert_that!(index.name).is_equal_to("alumni".to_string());
        assert_that!(index.docs_count).is_equal_to(12);
        assert_that!(index.status).is_equal_to(IndexStatus::Available);
    }

    #[test]
    fn health_string_maps_to_storage_health() {
        assert_that!(StorageHealth::try_from("green").unwrap()).is_equal_to(StorageHealth::OK);
        assert_that!(StorageHealth::try_from("yellow").unwrap()).is_equal_to(StorageHealth::OK);
        assert_that!(StorageHealth::try_from("red").unwrap()).is_equal_to(StorageHealth::FAIL);
        assert_that!(StorageHealth::try_from("chartreuse")).is_err();
    }
}
