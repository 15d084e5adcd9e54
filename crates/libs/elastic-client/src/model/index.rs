use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Index {
    pub name: String,
    pub docs_count: u32,
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum IndexStatus {
    Available,
    NotAvailable,
}

impl From<String> for IndexStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "open" => IndexStatus::Available,
            _ => IndexStatus::NotAvailable,
        }
    }
}
