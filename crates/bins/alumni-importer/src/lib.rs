//! Configuration and command line arguments of the alumni importer.
use serde::{Deserialize, Serialize};

use elastic_client::model::configuration::IndexConfig;
use elastic_client::settings::ElasticsearchStorageConfig;
use indexer_config::{ConfigError, IndexerConfig};
use records::Campus;
use salesforce_client::SalesforceConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub elasticsearch: ElasticsearchStorageConfig,
    pub salesforce: SalesforceConfig,
    /// The one real index holding every campus's documents.
    pub index: IndexConfig,
    /// Campuses to provision aliases for and to sync.
    pub campuses: Vec<Campus>,
    /// Oldest high school class year mirrored into the index.
    pub first_class_year: u16,
}

impl IndexerConfig<'_> for Settings {
    const ENV_PREFIX: &'static str = "ALUMNI";

    fn file_sources() -> Vec<&'static str> {
        vec![
            "elasticsearch.toml",
            "salesforce.toml",
            "alumni-importer.toml",
        ]
    }
}

impl Settings {
    pub fn new(opts: &Opts) -> Result<Self, ConfigError> {
        Self::get(&opts.settings)
    }
}

#[derive(Debug, clap::Parser)]
#[command(
    name = "alumni-importer",
    about = "Mirrors Salesforce alumni records into a shared Elasticsearch index, \
             with per-campus aliases standing in for separate indices",
    version = VERSION
)]
pub struct Opts {
    /// Override settings values using key=value
    #[arg(short = 's', long = "setting")]
    pub settings: Vec<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Ensure the index and campus aliases exist, then sync from Salesforce
    Run,
    /// Compare per-campus counts between Salesforce and Elasticsearch
    Counts,
    /// Print the resolved configuration
    Config,
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use speculoos::prelude::*;

    use super::*;

    fn opts(settings: Vec<String>) -> Opts {
        Opts {
            settings,
            cmd: Command::Run,
        }
    }

    #[test]
    fn should_return_ok_with_default_config_dir() {
        let settings = Settings::new(&opts(vec![]));
        assert!(
            settings.is_ok(),
            "Expected Ok, Got an Err: {}",
            settings.unwrap_err()
        );
        assert_that!(settings.unwrap().index.name).is_equal_to("alumni".to_string());
    }

    #[test]
    fn should_override_elasticsearch_url_with_command_line() -> anyhow::Result<()> {
        let settings = Settings::new(&opts(vec![String::from(
            "elasticsearch.url='http://localhost:9999'",
        )]))?;
        assert_that!(settings.elasticsearch.url.as_str())
            .is_equal_to("http://localhost:9999/");
        Ok(())
    }

    #[test]
    #[serial]
    fn should_override_first_class_year_with_environment_variable() -> anyhow::Result<()> {
        std::env::set_var("ALUMNI__FIRST_CLASS_YEAR", "2015");
        let settings = Settings::new(&opts(vec![]));
        std::env::remove_var("ALUMNI__FIRST_CLASS_YEAR");
        assert_that!(settings?.first_class_year).is_equal_to(2015);
        Ok(())
    }
}
