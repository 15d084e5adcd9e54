use serde::Serialize;

pub type Version = String;

#[derive(Debug, Clone, Serialize)]
pub struct Status {
    /// Version of this crate.
    pub version: String,
    pub storage: StorageStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageStatus {
    pub health: StorageHealth,
    pub version: Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageHealth {
    OK,
    FAIL,
}
