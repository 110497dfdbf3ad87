pub mod builder;
pub mod uid_root;

pub use builder::ConfigBuilder;
pub use uid_root::{UidRoot, UidRootError};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum ConfigError {
    #[error("invalid UID root: {0}")]
    InvalidUidRoot(String),

    #[error("invalid configuration: {0}")]
    InvalidFormat(String),
}

impl From<UidRootError> for ConfigError {
    fn from(err: UidRootError) -> Self {
        ConfigError::InvalidUidRoot(err.0)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidFormat(err.to_string())
    }
}

/// How much the de-identification steps report through the `log` facade.
///
/// Failures are always logged, whatever the level.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum TracingLevel {
    #[default]
    Off,
    /// Counts and phase completion.
    Summary,
    /// Every removed and assigned tag.
    Detailed,
}

impl TracingLevel {
    pub fn is_summary(&self) -> bool {
        *self >= TracingLevel::Summary
    }

    pub fn is_detailed(&self) -> bool {
        *self == TracingLevel::Detailed
    }
}

/// Maps a numeric level (or a count of `-v` flags) to a [`TracingLevel`], saturating at
/// [`TracingLevel::Detailed`].
impl From<u8> for TracingLevel {
    fn from(level: u8) -> Self {
        match level {
            0 => TracingLevel::Off,
            1 => TracingLevel::Summary,
            _ => TracingLevel::Detailed,
        }
    }
}

/// The `log` filter under which every message of a [`TracingLevel`] gets through.
impl From<TracingLevel> for LevelFilter {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Off => LevelFilter::Warn,
            TracingLevel::Summary => LevelFilter::Info,
            TracingLevel::Detailed => LevelFilter::Debug,
        }
    }
}

/// Which elements redaction looks at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RedactionScope {
    /// Only the top-level elements of a dataset. Confidential values nested inside the items
    /// of sequences that are themselves not confidential are left untouched.
    #[default]
    TopLevel,

    /// The top-level elements, plus the elements of every item of the sequences that survive
    /// top-level redaction (one level deep).
    Nested,
}

/// Configuration for de-identification.
///
/// # Fields
///
/// * `uid_root` - The prefix of the UIDs generated for study, series and SOP instance
/// * `redaction_scope` - Whether redaction descends into sequence items
/// * `tracing_level` - How much is reported about each run
///
/// Fields absent from a JSON configuration take their default value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "UidRoot::default_root")]
    uid_root: UidRoot,

    #[serde(default)]
    redaction_scope: RedactionScope,

    #[serde(default)]
    tracing_level: TracingLevel,
}

impl Config {
    fn new(uid_root: UidRoot, redaction_scope: RedactionScope, tracing_level: TracingLevel) -> Self {
        Self {
            uid_root,
            redaction_scope,
            tracing_level,
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use dicom_deidentification::config::{Config, RedactionScope};
    ///
    /// let config = Config::from_json(r#"{"uid_root": "1.2.840.123", "redaction_scope": "nested"}"#).unwrap();
    /// assert_eq!(config.get_uid_root().as_ref(), "1.2.840.123");
    /// assert_eq!(config.get_redaction_scope(), RedactionScope::Nested);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get_uid_root(&self) -> &UidRoot {
        &self.uid_root
    }

    pub fn get_redaction_scope(&self) -> RedactionScope {
        self.redaction_scope
    }

    pub fn get_tracing_level(&self) -> TracingLevel {
        self.tracing_level
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            UidRoot::default_root(),
            RedactionScope::default(),
            TracingLevel::default(),
        )
    }
}
