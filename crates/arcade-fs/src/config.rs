//! Format-agnostic configuration loading

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and deserializes the content
/// transparently. Arcade only ever reads configuration; writing it back is
/// left to the front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new ConfigStore.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        self.parse(path, extension, &content)
    }

    /// Parse configuration content already read into memory.
    pub fn parse<T: DeserializeOwned>(&self, path: &Path, extension: &str, content: &str) -> Result<T> {
        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        interval: u64,
    }

    #[test]
    fn test_load_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.toml");
        fs::write(&path, "name = \"library\"\ninterval = 30\n").unwrap();

        let sample: Sample = ConfigStore::new().load(&path).unwrap();
        assert_eq!(sample.name, "library");
        assert_eq!(sample.interval, 30);
    }

    #[test]
    fn test_load_json_and_yaml_agree() {
        let temp = TempDir::new().unwrap();
        let json = temp.path().join("sample.json");
        let yaml = temp.path().join("sample.yml");
        fs::write(&json, r#"{"name": "library", "interval": 5}"#).unwrap();
        fs::write(&yaml, "name: library\ninterval: 5\n").unwrap();

        let store = ConfigStore::new();
        let a: Sample = store.load(&json).unwrap();
        let b: Sample = store.load(&yaml).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.ini");
        fs::write(&path, "name=library").unwrap();

        let result: Result<Sample> = ConfigStore::new().load(&path);
        assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_parse_error_names_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "name = ").unwrap();

        let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
