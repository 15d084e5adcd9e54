use serde::Deserialize;
use thiserror::Error;

/// Response body of the `_bulk` API, trimmed down to the fields we act on.
#[derive(Debug, Deserialize)]
pub struct ElasticsearchBulkResponse {
    #[serde(default)]
    pub errors: bool,
    pub items: Vec<ElasticsearchBulkItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElasticsearchBulkItem {
    Index(ElasticsearchBulkStatus),
    Create(ElasticsearchBulkStatus),
    Update(ElasticsearchBulkStatus),
    Delete(ElasticsearchBulkStatus),
}

impl ElasticsearchBulkItem {
    pub fn inner(self) -> ElasticsearchBulkStatus {
        match self {
            ElasticsearchBulkItem::Index(inner) => inner,
            ElasticsearchBulkItem::Create(inner) => inner,
            ElasticsearchBulkItem::Update(inner) => inner,
            ElasticsearchBulkItem::Delete(inner) => inner,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ElasticsearchBulkStatus {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: u16,
    pub result: Option<ElasticsearchBulkResult>,
    pub error: Option<ElasticsearchBulkError>,
}

impl ElasticsearchBulkStatus {
    /// Per-document outcome; failures carry the document id back.
    pub fn outcome(self) -> Result<ElasticsearchBulkResult, (String, ElasticsearchBulkError)> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err((self.id, error)),
            (None, None) => Err((
                self.id,
                ElasticsearchBulkError {
                    error_type: "unknown".to_string(),
                    reason: "bulk item carried neither result nor error".to_string(),
                },
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElasticsearchBulkResult {
    Created,
    Updated,
    Noop,
    Deleted,
}

#[derive(Debug, Clone, Deserialize, Error)]
#[error("{error_type}: {reason}")]
pub struct ElasticsearchBulkError {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub reason: String,
}

/// Response body of the `_count` API.
#[derive(Debug, Deserialize)]
pub struct ElasticsearchCountResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    #[test]
    fn decodes_successful_bulk_items() -> anyhow::Result<()> {
        let body = r#"{
            "took": 3,
            "errors": false,
            "items": [
                {"index": {"_index": "alumni", "_id": "42", "status": 201, "result": "created"}},
                {"index": {"_index": "alumni", "_id": "43", "status": 200, "result": "updated"}},
                {"update": {"_index": "alumni", "_id": "44", "status": 200, "result": "noop"}}
            ]
        }"#;

        let response: ElasticsearchBulkResponse = serde_json::from_str(body)?;
        assert_that!(response.errors).is_false();

        let outcomes: Vec<_> = response
            .items
            .into_iter()
            .map(|item| item.inner().outcome().unwrap())
            .collect();

        assert_that!(outcomes).is_equal_to(vec![
            ElasticsearchBulkResult::Created,
            ElasticsearchBulkResult::Updated,
            ElasticsearchBulkResult::Noop,
        ]);
        Ok(())
    }

    #[test]
    fn decodes_failed_bulk_items() -> anyhow::Result<()> {
        let body = r#"{
            "took": 1,
            "errors": true,
            "items": [
                {"index": {
                    "_index": "alumni",
                    "_id": "42",
                    "status": 400,
                    "error": {"type": "mapper_parsing_exception", "reason": "failed to parse"}
                }}
            ]
        }"#;

        let response: ElasticsearchBulkResponse = serde_json::from_str(body)?;
        assert_that!(response.errors).is_true();

        let (id, error) = response
            .items
            .into_iter()
            .next()
            .unwrap()
            .inner()
            .outcome()
            .unwrap_err();

        assert_that!(id).is_equal_to("42".to_string());
        assert_that!(error.error_type).is_equal_to("mapper_parsing_exception".to_string());
        Ok(())
    }

    #[test]
    fn decodes_count_response() -> anyhow::Result<()> {
        let body = r#"{"count": 128, "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0}}"#;
        let response: ElasticsearchCountResponse = serde_json::from_str(body)?;
        assert_that!(response.count).is_equal_to(128);
        Ok(())
    }
}
