//! Runtime settings for token streaming
//!
//! The built-in values live in `defaults/lexdef.default.toml`, which is
//! compiled into the crate. A [`ConfigLoader`] starts from that file, then
//! applies the caller's TOML files in the order they were added, then any
//! typed setters. The result is checked before it is handed out, so a
//! [`LexdefConfig`] that came out of [`ConfigLoader::load`] is always usable.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/lexdef.default.toml");

const CAPACITY_KEY: &str = "stream.capacity";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LexdefConfig {
    pub stream: StreamConfig,
}

impl LexdefConfig {
    /// The embedded defaults, as a loaded configuration.
    pub fn defaults() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.stream.capacity == 0 {
            return Err(ConfigError::Message(format!(
                "{} must be at least 1",
                CAPACITY_KEY
            )));
        }
        Ok(self)
    }
}

/// Token channel settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamConfig {
    /// Tokens buffered before the producer blocks; at least 1
    pub capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Builds a [`LexdefConfig`] from the defaults plus caller-supplied layers
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Layer a TOML file over what has been added so far.
    ///
    /// The file is read by [`ConfigLoader::load`], which fails if it is missing.
    pub fn layer_file(mut self, path: impl AsRef<Path>) -> Self {
        let file = File::from(path.as_ref()).format(FileFormat::Toml).required(true);
        self.builder = self.builder.add_source(file);
        self
    }

    /// Set the token channel capacity, taking precedence over every file.
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self, ConfigError> {
        let capacity = i64::try_from(capacity)
            .map_err(|_| ConfigError::Message(format!("{} is out of range", CAPACITY_KEY)))?;
        self.builder = self.builder.set_override(CAPACITY_KEY, capacity)?;
        Ok(self)
    }

    pub fn load(self) -> Result<LexdefConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<LexdefConfig>()?
            .validate()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let config = LexdefConfig::defaults().unwrap();
        assert_eq!(config.stream.capacity, 64);
        assert_eq!(config, LexdefConfig::default());
    }

    #[test]
    fn test_layered_file_overrides_defaults() {
        let file = toml_file("[stream]\ncapacity = 8\n");
        let config = ConfigLoader::new().layer_file(file.path()).load().unwrap();
        assert_eq!(config.stream.capacity, 8);
    }

    #[test]
    fn test_later_layers_win() {
        let first = toml_file("[stream]\ncapacity = 8\n");
        let second = toml_file("[stream]\ncapacity = 16\n");
        let config = ConfigLoader::new()
            .layer_file(first.path())
            .layer_file(second.path())
            .load()
            .unwrap();
        assert_eq!(config.stream.capacity, 16);

        let config = ConfigLoader::new()
            .with_capacity(3)
            .unwrap()
            .layer_file(second.path())
            .load()
            .unwrap();
        assert_eq!(config.stream.capacity, 3);
    }

    #[test]
    fn test_file_without_stream_table_keeps_defaults() {
        let file = toml_file("# nothing to change\n");
        let config = ConfigLoader::new().layer_file(file.path()).load().unwrap();
        assert_eq!(config.stream.capacity, 64);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new()
            .layer_file(dir.path().join("absent.toml"))
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let file = toml_file("[stream]\ncapacity = 0\n");
        let err = ConfigLoader::new().layer_file(file.path()).load().unwrap_err();
        assert!(err.to_string().contains("stream.capacity"));

        let err = ConfigLoader::new().with_capacity(0).unwrap().load().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = toml_file("[stream]\ncapacity = \"lots\"\n");
        assert!(ConfigLoader::new().layer_file(file.path()).load().is_err());
    }
}
