use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str =
    "https://gateway.watsonplatform.net/natural-language-classifier/api";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Settings of the document store the stub writes to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database holding classifier documents
    pub dbname: String,
    /// Snapshot file for the in-memory store, if any
    pub snapshot_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dbname: "nlc".to_string(),
            snapshot_path: None,
        }
    }
}

/// Limits and settings of the classifier stub.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes:
///
/// ```
/// use nlc_stub::NlcConfig;
///
/// let config: NlcConfig = serde_json::from_str(r#"{"max_classifiers": 2}"#).unwrap();
/// assert_eq!(config.max_classifiers, 2);
/// assert_eq!(config.max_classes, 3000);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NlcConfig {
    /// Prefix of the synthetic classifier URLs
    pub base_url: String,
    pub min_instances: usize,
    pub max_instances: usize,
    pub max_phrase_length: usize,
    pub max_classes: usize,
    /// Entitlement ceiling: classifiers allowed in one store
    pub max_classifiers: usize,
    /// Classes returned by classify
    pub max_results: usize,
    pub store: StoreConfig,
}

impl Default for NlcConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_instances: 5,
            max_instances: 20_000,
            max_phrase_length: 1024,
            max_classes: 3000,
            max_classifiers: 8,
            max_results: 10,
            store: StoreConfig::default(),
        }
    }
}

impl NlcConfig {
    /// Loads a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Applies `NLC_STUB_*` environment overrides on top of `self`
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = env::var("NLC_STUB_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(dbname) = env::var("NLC_STUB_DBNAME") {
            self.store.dbname = dbname;
        }
        if let Ok(path) = env::var("NLC_STUB_SNAPSHOT") {
            self.store.snapshot_path = Some(PathBuf::from(path));
        }
        override_number("NLC_STUB_MAX_INSTANCES", &mut self.max_instances)?;
        override_number("NLC_STUB_MAX_CLASSES", &mut self.max_classes)?;
        override_number("NLC_STUB_MAX_CLASSIFIERS", &mut self.max_classifiers)?;
        Ok(self)
    }

    /// Resource URL of a classifier
    pub fn classifier_url(&self, classifier_id: &str) -> String {
        format!("{}/v1/classifiers/{}", self.base_url.trim_end_matches('/'), classifier_id)
    }

    /// Snapshot file to use: the configured one or the default location
    pub fn snapshot_path(&self) -> PathBuf {
        self.store
            .snapshot_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join(format!("{}.json", self.store.dbname)))
    }
}

fn override_number<T: FromStr>(name: &str, target: &mut T) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(name) {
        *target = value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        })?;
    }
    Ok(())
}

/// Returns the default directory for snapshot files
pub fn default_data_dir() -> PathBuf {
    // 1. Check environment variable
    if let Ok(path) = env::var("NLC_STUB_HOME") {
        return PathBuf::from(path);
    }

    // 2. Use platform-specific data directory
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("nlc-stub");
    }

    // 3. Fallback to user's home directory
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(".local").join("share").join("nlc-stub");
    }

    // 4. If all else fails, use system temp directory
    env::temp_dir().join("nlc-stub")
}
