use serde::{Deserialize, Serialize};

/// Settings of the one real index this tool manages.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub name: String,
    pub number_of_shards: u64,
    pub number_of_replicas: u64,
}
