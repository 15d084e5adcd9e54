use serde::{Deserialize, Serialize};

use crate::Document;

/// An alumni record mirrored from a Salesforce `Contact`.
///
/// The Elasticsearch copy is a derived, rebuildable cache; Salesforce stays
/// the source of truth. The `campus` field is what the per-campus alias
/// filters match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alum {
    /// Noble network ID, also used as the document `_id`.
    pub network_id: i64,
    pub safe_id: String,
    pub campus: String,
    pub last_name: String,
    pub first_name: String,
    pub full_name: String,
    pub class_year: u16,
    /// Empty string when no Facebook ID is on file in Salesforce;
    /// uniqueness is not enforced.
    #[serde(default)]
    pub facebook_id: String,
    /// `OwnerId` of the Contact in Salesforce (alumni counselor).
    pub ac_safe_id: String,
}

impl Document for Alum {
    fn id(&self) -> String {
        self.network_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    fn sample() -> Alum {
        Alum {
            network_id: 31_415,
            safe_id: "003A0000015".to_string(),
            campus: "bulls".to_string(),
            last_name: "Doe".to_string(),
            first_name: "Jordan".to_string(),
            full_name: "Jordan Doe".to_string(),
            class_year: 2014,
            facebook_id: String::new(),
            ac_safe_id: "005A0000002".to_string(),
        }
    }

    #[test]
    fn document_id_is_the_network_id() {
        assert_that!(sample().id()).is_equal_to("31415".to_string());
    }

    #[test]
    fn serializes_empty_facebook_id_as_empty_string() -> anyhow::Result<()> {
        let json = serde_json::to_value(sample())?;
        assert_that!(json["facebook_id"].as_str()).contains_value("");
        assert_that!(json["class_year"].as_u64()).contains_value(2014u64);
        Ok(())
    }
}
