pub mod configuration;
pub mod index;
pub mod stats;
pub mod status;
