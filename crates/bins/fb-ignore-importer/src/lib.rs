//! Configuration, command line arguments and CSV reading of the fb-ignore
//! importer.
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use elastic_client::model::configuration::IndexConfig;
use elastic_client::settings::ElasticsearchStorageConfig;
use indexer_config::{ConfigError, IndexerConfig};
use records::NonAlumContact;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub elasticsearch: ElasticsearchStorageConfig,
    pub index: IndexConfig,
}

impl IndexerConfig<'_> for Settings {
    const ENV_PREFIX: &'static str = "FB_IGNORE";

    fn file_sources() -> Vec<&'static str> {
        vec!["elasticsearch.toml", "fb-ignore-importer.toml"]
    }
}

impl Settings {
    pub fn new(opts: &Opts) -> Result<Self, ConfigError> {
        Self::get(&opts.settings)
    }
}

#[derive(Debug, clap::Parser)]
#[command(
    name = "fb-ignore-importer",
    about = "Indexes Facebook contacts that are known to not be alumni",
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
    /// Ensure the fb-ignore index exists and load the CSV into it
    Run {
        /// CSV of matched ignores, with 'Facebook Name' and 'Facebook ID'
        /// columns.
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
    },
    /// Print the resolved configuration
    Config,
}

#[derive(Debug, Deserialize)]
struct IgnoreRow {
    #[serde(rename = "Facebook Name")]
    facebook_name: String,
    #[serde(rename = "Facebook ID")]
    facebook_id: Option<String>,
}

/// Reads the matched-ignores CSV into indexable documents.
pub fn read_ignores(path: &Path) -> Result<Vec<NonAlumContact>, CsvError> {
    let file = std::fs::File::open(path)?;
    parse_ignores(file)
}

fn parse_ignores<R: io::Read>(reader: R) -> Result<Vec<NonAlumContact>, CsvError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut contacts = Vec::new();

    for (position, row) in csv_reader.deserialize().enumerate() {
        let row: IgnoreRow = row?;

        // Facebook IDs come in as '<id>@facebook.com'; an absent ID becomes
        // an empty string.
        let facebook_id = row
            .facebook_id
            .as_deref()
            .unwrap_or("")
            .split('@')
            .next()
            .unwrap_or("")
            .to_string();

        contacts.push(NonAlumContact {
            id: position as u64 + 1,
            facebook_name: row.facebook_name,
            facebook_id,
        });
    }

    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    const SAMPLE: &str = "\
Facebook Name,Facebook ID
Pat Smith,12345@facebook.com
Sam Jones,
";

    #[test]
    fn rows_get_sequential_ids_and_bare_facebook_ids() -> anyhow::Result<()> {
        let contacts = parse_ignores(SAMPLE.as_bytes())?;

        assert_that!(contacts).has_length(2);
        assert_that!(contacts[0].id).is_equal_to(1);
        assert_that!(contacts[0].facebook_name).is_equal_to("Pat Smith".to_string());
        assert_that!(contacts[0].facebook_id).is_equal_to("12345".to_string());

        assert_that!(contacts[1].id).is_equal_to(2);
        assert_that!(contacts[1].facebook_id).is_equal_to(String::new());
        Ok(())
    }

    #[test]
    fn settings_load_from_the_default_config_dir() {
        let opts = Opts {
            settings: vec![],
            cmd: Command::Config,
        };
        let settings = Settings::new(&opts);
        assert!(
            settings.is_ok(),
            "Expected Ok, Got an Err: {}",
            settings.unwrap_err()
        );
        assert_that!(settings.unwrap().index.name).is_equal_to("fb-ignore".to_string());
    }

    #[test]
    fn config_subcommand_needs_no_input_file() {
        use clap::Parser;

        assert_that!(Opts::try_parse_from(["fb-ignore-importer", "config"])).is_ok();
        assert_that!(Opts::try_parse_from(["fb-ignore-importer", "run"])).is_err();
        assert_that!(Opts::try_parse_from([
            "fb-ignore-importer",
            "run",
            "--input",
            "matched_ignores.csv",
        ]))
        .is_ok();
    }
}
