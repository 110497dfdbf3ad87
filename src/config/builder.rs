use super::{Config, RedactionScope, TracingLevel, UidRoot};

/// A builder for [`Config`], starting from its defaults.
///
/// # Example
///
/// ```
/// use dicom_deidentification::config::{ConfigBuilder, TracingLevel};
///
/// let config = ConfigBuilder::new()
///     .uid_root("1.2.840.123".parse().unwrap())
///     .tracing_level(TracingLevel::Summary)
///     .build();
/// assert_eq!(config.get_tracing_level(), TracingLevel::Summary);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder(Config::default())
    }

    /// Starts from an existing configuration, for example one loaded from a file, so that
    /// individual settings can be overridden.
    pub fn from_config(config: Config) -> Self {
        ConfigBuilder(config)
    }

    /// Sets the UID root for the configuration.
    ///
    /// The [`UidRoot`] provides the prefix used for newly generated Study, Series and SOP
    /// Instance UIDs. Without one, `"9999"` is used.
    pub fn uid_root(mut self, uid_root: UidRoot) -> Self {
        self.0.uid_root = uid_root;
        self
    }

    /// Sets whether redaction also removes confidential elements from the items of
    /// sequences.
    ///
    /// # Example
    ///
    /// ```
    /// use dicom_deidentification::config::{ConfigBuilder, RedactionScope};
    ///
    /// let config = ConfigBuilder::new()
    ///     .redaction_scope(RedactionScope::Nested)
    ///     .build();
    /// ```
    pub fn redaction_scope(mut self, redaction_scope: RedactionScope) -> Self {
        self.0.redaction_scope = redaction_scope;
        self
    }

    pub fn tracing_level(mut self, tracing_level: TracingLevel) -> Self {
        self.0.tracing_level = tracing_level;
        self
    }

    pub fn build(self) -> Config {
        self.0
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
