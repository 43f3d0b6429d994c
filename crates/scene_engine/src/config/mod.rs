//! Configuration system
//!
//! Settings structs implement [`Config`] and are read from or written to
//! TOML or RON files, picked by file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// On-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format matching the path's extension
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Self::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Toml => {
                toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    /// I/O, parse or unsupported-extension errors.
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        format.parse(&contents)
    }

    /// Load configuration from file, falling back to defaults when the file
    /// does not exist
    ///
    /// # Errors
    /// Same as [`load_from_file`](Self::load_from_file), except a missing file.
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// I/O, serialization or unsupported-extension errors.
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = ConfigFormat::from_path(path)?.render(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value was parsed but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Window {
        title: String,
        width: u32,
    }

    impl Config for Window {}

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("b.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("b.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(Window::load_or_default(&path).unwrap(), Window::default());
        assert!(matches!(Window::load_from_file(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(title: ").unwrap();
        assert!(matches!(Window::load_from_file(&path), Err(ConfigError::Parse(_))));
    }
}
