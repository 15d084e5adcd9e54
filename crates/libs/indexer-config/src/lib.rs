use std::io;
use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../config");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    ConfigCompilation(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    IOError(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Directory holding the default TOML configuration.
///
/// The system-wide directory wins when it exists, otherwise the in-repo
/// `config/` directory is used.
pub fn config_dir() -> PathBuf {
    let config_dir = PathBuf::from("/etc/alumni-indexer/");
    if config_dir.exists() {
        config_dir
    } else {
        PathBuf::from(DEV_CONFIG_PATH)
    }
}

/// Configuration sections are loaded from three layered sources, the later
/// ones overriding the earlier: TOML files under [`config_dir`], environment
/// variables (`<PREFIX>__SECTION__KEY`), and `key=value` command line
/// overrides parsed as TOML fragments.
pub trait IndexerConfig<'a>: Deserialize<'a> {
    const ENV_PREFIX: &'static str;

    fn file_sources() -> Vec<&'static str> {
        vec![]
    }

    fn root_key() -> Option<&'static str> {
        None
    }

    fn get(overrides: &[String]) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        let mut override_env = vec![];
        for value in overrides {
            // If a root key is present, prepend it to the override, so that
            // "url=..." targets "elasticsearch.url=..." and the like.
            let value = match Self::root_key() {
                None => value.clone(),
                Some(key) => format!("{key}.{value}"),
            };

            override_env.push(File::from_str(&value, FileFormat::Toml));
        }

        let config_sources: Vec<File<_, _>> = Self::file_sources()
            .iter()
            .map(PathBuf::from)
            .map(|path| config_dir().join(path))
            .map(File::from)
            .collect();

        let config = Config::builder()
            .add_source(config_sources)
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .separator("__")
                    .prefix_separator("__"),
            )
            .add_source(override_env)
            .build()?;

        match Self::root_key() {
            None => Ok(config.try_deserialize()?),
            Some(key) => Ok(config.get::<Self>(key)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use speculoos::assert_that;

    use super::*;

    #[derive(Deserialize, Debug)]
    pub struct TestSettings {
        foo: u32,
    }

    #[derive(Deserialize, Debug)]
    pub struct TestSettingsWithArray {
        foo: Vec<String>,
    }

    #[derive(Deserialize, Debug)]
    pub struct TestSettingsMultipleAssignments {
        url: String,
        inner: InnerSettings,
    }

    #[derive(Deserialize, Debug)]
    pub struct InnerSettings {
        port: u16,
    }

    impl IndexerConfig<'_> for TestSettings {
        const ENV_PREFIX: &'static str = "TEST";
    }

    impl IndexerConfig<'_> for TestSettingsWithArray {
        const ENV_PREFIX: &'static str = "TEST";
    }

    impl IndexerConfig<'_> for TestSettingsMultipleAssignments {
        const ENV_PREFIX: &'static str = "TEST";
    }

    #[test]
    fn should_create_a_source_from_int_assignment() -> anyhow::Result<()> {
        let overrides = vec!["foo=42".to_string()];
        let config = TestSettings::get(&overrides)?;
        assert_that!(config).map(|c| &c.foo).is_equal_to(42);
        Ok(())
    }

    #[test]
    fn should_create_a_source_from_array_assignment() -> anyhow::Result<()> {
        let overrides = vec![String::from("foo=[ 'bulls','rauner' ]")];
        let config = TestSettingsWithArray::get(&overrides)?;
        assert_that!(config)
            .map(|c| &c.foo)
            .is_equal_to(vec!["bulls".to_string(), "rauner".to_string()]);
        Ok(())
    }

    #[test]
    fn should_create_a_source_from_multiple_assignments() -> anyhow::Result<()> {
        let overrides = vec![
            String::from("url='http://localhost:9200'"),
            String::from("inner.port=6666"),
        ];
        let config = TestSettingsMultipleAssignments::get(&overrides)?;
        assert_that!(config.url).is_equal_to("http://localhost:9200".to_string());
        assert_that!(config.inner.port).is_equal_to(6666);
        Ok(())
    }

    #[test]
    #[serial]
    fn should_read_values_from_the_environment() -> anyhow::Result<()> {
        std::env::set_var("TEST__FOO", "7");
        let config = TestSettings::get(&[]);
        std::env::remove_var("TEST__FOO");
        assert_that!(config?.foo).is_equal_to(7);
        Ok(())
    }
}
