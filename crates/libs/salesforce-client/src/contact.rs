use serde::de::{self, Deserializer};
use serde::Deserialize;

use records::Alum;

/// The Contact fields mirrored into the alumni index.
///
/// Salesforce may serialize numeric custom fields as JSON numbers or
/// strings depending on the field type, so the id and class year accept
/// both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactRecord {
    #[serde(rename = "Safe_Id__c")]
    pub safe_id: String,
    #[serde(rename = "Network_Student_ID__c", deserialize_with = "flexible_i64")]
    pub network_student_id: i64,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "Name")]
    pub full_name: String,
    #[serde(rename = "HS_Class__c", deserialize_with = "flexible_u16")]
    pub hs_class: u16,
    #[serde(rename = "Facebook_ID__c")]
    pub facebook_id: Option<String>,
    #[serde(rename = "OwnerId")]
    pub owner_id: String,
}

impl ContactRecord {
    /// Maps this Contact onto the indexed alum document for `campus`.
    ///
    /// A missing Facebook ID becomes an empty string; uniqueness is not
    /// enforced in Elasticsearch.
    pub fn into_alum(self, campus: &str) -> Alum {
        Alum {
            network_id: self.network_student_id,
            safe_id: self.safe_id,
            campus: campus.to_string(),
            last_name: self.last_name,
            first_name: self.first_name,
            full_name: self.full_name,
            class_year: self.hs_class,
            facebook_id: self.facebook_id.unwrap_or_default(),
            ac_safe_id: self.owner_id,
        }
    }
}

/// SOQL selecting one campus's alumni from the cutoff class year on.
pub fn alumni_query(account_id: &str, first_class_year: u16) -> String {
    format!(
        "SELECT Safe_Id__c, Network_Student_ID__c, LastName, FirstName, Name, \
         HS_Class__c, Facebook_ID__c, OwnerId \
         FROM Contact \
         WHERE AccountId = '{account_id}' AND HS_Class__c >= '{first_class_year}'"
    )
}

/// SOQL counting every Contact of one campus.
pub fn campus_count_query(account_id: &str) -> String {
    format!("SELECT COUNT() FROM Contact WHERE AccountId = '{account_id}'")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(value) => Ok(value),
        NumberOrString::Float(value) => Ok(value as i64),
        NumberOrString::Str(value) => value.trim().parse::<i64>().map_err(de::Error::custom),
    }
}

fn flexible_u16<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = flexible_i64(deserializer)?;
    u16::try_from(value).map_err(de::Error::custom)
}
