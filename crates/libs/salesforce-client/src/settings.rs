use std::time::Duration;

use indexer_config::IndexerConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use serde_helpers::deserialize_duration;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SalesforceConfig {
    /// Token endpoint host, usually https://login.salesforce.com (or
    /// https://test.salesforce.com for sandboxes).
    pub login_url: Url,
    pub username: String,
    pub password: String,
    /// Appended to the password for the username-password token grant.
    pub security_token: String,
    /// Connected app credentials.
    pub client_id: String,
    pub client_secret: String,
    /// REST API version, e.g. "v52.0".
    pub api_version: String,
    /// Timeout in milliseconds on client calls to Salesforce.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl IndexerConfig<'_> for SalesforceConfig {
    const ENV_PREFIX: &'static str = "SALESFORCE";

    fn file_sources() -> Vec<&'static str> {
        vec!["salesforce.toml"]
    }

    fn root_key() -> Option<&'static str> {
        Some("salesforce")
    }
}
