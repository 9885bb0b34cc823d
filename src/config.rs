//! Service configuration.
//!
//! Values come from built-in defaults, then an optional JSON file named by
//! `UTTALE_CONFIG`, then `UTTALE_*` environment variables.

use crate::core::trie::DEFAULT_SUGGESTION_LIMIT;
use crate::core::types::VariantTag;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "UTTALE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Socket address the HTTP service listens on.
    pub bind: String,
    /// Bincode snapshot of the lexicon and example stores.
    pub snapshot: PathBuf,
    /// JSON lexicon table, `{word: {variant: ipa}}`. Used when the snapshot is missing.
    pub lexicon_table: Option<PathBuf>,
    /// JSON example table, `{word: [[sentence, file, dialect], ...]}`.
    pub examples_table: Option<PathBuf>,
    /// Write a snapshot after importing JSON tables.
    pub write_snapshot: bool,
    pub static_dir: PathBuf,
    /// Served under `/data`.
    pub data_dir: PathBuf,
    /// Prepended to example audio references in API responses.
    pub audio_url_prefix: String,
    pub suggest_limit: usize,
    pub max_suggest_limit: usize,
    pub default_variant: VariantTag,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            snapshot: PathBuf::from("data/uttale.bin"),
            lexicon_table: None,
            examples_table: None,
            write_snapshot: true,
            static_dir: PathBuf::from("static"),
            data_dir: PathBuf::from("data"),
            audio_url_prefix: "data/nb_samtale".to_string(),
            suggest_limit: DEFAULT_SUGGESTION_LIMIT,
            max_suggest_limit: 50,
            default_variant: VariantTag::default(),
        }
    }
}

impl Config {
    /// Loads the process configuration from the file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overrides fields from environment-style variables looked up via `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("PORT") {
            let port: u16 = parse("PORT", port)?;
            self.bind = format!("0.0.0.0:{port}");
        }
        if let Some(bind) = var("UTTALE_BIND") {
            self.bind = bind;
        }
        if let Some(path) = var("UTTALE_SNAPSHOT") {
            self.snapshot = PathBuf::from(path);
        }
        if let Some(path) = var("UTTALE_LEXICON") {
            self.lexicon_table = Some(PathBuf::from(path));
        }
        if let Some(path) = var("UTTALE_EXAMPLES") {
            self.examples_table = Some(PathBuf::from(path));
        }
        if let Some(flag) = var("UTTALE_WRITE_SNAPSHOT") {
            self.write_snapshot = match flag.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue { key: "UTTALE_WRITE_SNAPSHOT", value: flag })
                }
            };
        }
        if let Some(dir) = var("UTTALE_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("UTTALE_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = var("UTTALE_AUDIO_PREFIX") {
            self.audio_url_prefix = prefix;
        }
        if let Some(limit) = var("UTTALE_SUGGEST_LIMIT") {
            self.suggest_limit = parse("UTTALE_SUGGEST_LIMIT", limit)?;
        }
        if let Some(limit) = var("UTTALE_MAX_SUGGEST_LIMIT") {
            self.max_suggest_limit = parse("UTTALE_MAX_SUGGEST_LIMIT", limit)?;
        }
        if let Some(variant) = var("UTTALE_DEFAULT_VARIANT") {
            self.default_variant = parse("UTTALE_DEFAULT_VARIANT", variant)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_suggest_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_suggest_limit",
                value: self.max_suggest_limit.to_string(),
            });
        }
        if self.suggest_limit == 0 || self.suggest_limit > self.max_suggest_limit {
            return Err(ConfigError::InvalidValue {
                key: "suggest_limit",
                value: self.suggest_limit.to_string(),
            });
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Dialect, Register};
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.suggest_limit, 10);
        assert_eq!(config.default_variant.to_string(), "e_written");
    }

    #[test]
    fn environment_overrides_fields() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("PORT", "8000"),
                ("UTTALE_LEXICON", "tables/lexicon.json"),
                ("UTTALE_WRITE_SNAPSHOT", "no"),
                ("UTTALE_SUGGEST_LIMIT", "5"),
                ("UTTALE_DEFAULT_VARIANT", "n_spoken"),
            ]))
            .unwrap();
        assert_eq!(config.bind, "0.0.0.0:8000");
        assert_eq!(config.lexicon_table, Some(PathBuf::from("tables/lexicon.json")));
        assert!(!config.write_snapshot);
        assert_eq!(config.suggest_limit, 5);
        assert_eq!(config.default_variant, VariantTag::new(Dialect::North, Register::Spoken));
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.apply_env(env(&[("UTTALE_DEFAULT_VARIANT", "x_sung")])),
            Err(ConfigError::InvalidValue { key: "UTTALE_DEFAULT_VARIANT", .. })
        ));
        assert!(config.apply_env(env(&[("PORT", "http")])).is_err());

        let config = Config { suggest_limit: 80, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_fill_in_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bind": "127.0.0.1:9000", "default_variant": "w_spoken"}}"#).unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.default_variant.to_string(), "w_spoken");
        assert_eq!(config.snapshot, PathBuf::from("data/uttale.bin"));
    }
}
