use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::ConnectOptions;

/// Errors that can occur when loading connect options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Failed to read options file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse connect options: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
}

impl ConnectOptions {
    /// Parses options from TOML text. Absent keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, OptionsError> {
        toml::from_str(content).map_err(|source| OptionsError::Parse { source })
    }

    /// Loads options from a TOML file.
    ///
    /// - If the file doesn't exist, returns `ConnectOptions::default()`.
    /// - Returns an error if reading or parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no options file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(OptionsError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        Self::from_toml_str(&content)
    }

    /// Serializes options back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_defaults() {
        let options = ConnectOptions::from_toml_str("").unwrap();
        assert_eq!(options, ConnectOptions::default());
        assert!(options.pure);
        assert!(!options.forward_ref);
    }

    #[test]
    fn test_partial_text_keeps_other_defaults() {
        let options = ConnectOptions::from_toml_str("forward_ref = true\nstore_key = \"admin\"").unwrap();
        assert!(options.pure);
        assert!(options.forward_ref);
        assert_eq!(options.store_key.as_deref(), Some("admin"));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = ConnectOptions::from_toml_str("pure = \"yes\"").unwrap_err();
        assert!(matches!(err, OptionsError::Parse { .. }));
    }

    #[test]
    fn test_to_toml_string_omits_absent_store_key() {
        let text = ConnectOptions::default().to_toml_string().unwrap();
        assert!(text.contains("pure = true"));
        assert!(!text.contains("store_key"));
    }
}
