use serde::{Deserialize, Serialize};

use crate::Document;

/// A Facebook contact known to not be an alum, indexed so that note
/// processing can skip it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonAlumContact {
    /// Sequential id; bulk creates require an explicit `_id` since ES 5.
    pub id: u64,
    pub facebook_name: String,
    /// Empty string when the source row has no Facebook ID.
    #[serde(default)]
    pub facebook_id: String,
}

impl Document for NonAlumContact {
    fn id(&self) -> String {
        self.id.to_string()
    }
}
