//! Connection settings for the review session.
//!
//! Settings are an explicit struct handed to the session at construction;
//! the session re-reads them only through its settings-changed hook. The
//! on-disk format is a small TOML file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use toml::Value;

const KNOWN_KEYS: [&str; 4] = ["collection", "access-token", "project", "repository"];

/// Azure DevOps connection settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewConfig {
    /// Collection URL, for example `https://dev.azure.com/fabrikam`.
    pub collection_url: Option<String>,
    /// Personal access token used by the backend implementation.
    pub access_token: Option<String>,
    pub project: Option<String>,
    pub repository: Option<String>,
}

impl ReviewConfig {
    /// Whether enough settings are present to talk to a backend at all.
    pub fn is_complete(&self) -> bool {
        self.collection_url.as_deref().is_some_and(|v| !v.is_empty())
            && self.access_token.as_deref().is_some_and(|v| !v.is_empty())
            && self.project.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLoadOutcome {
    pub config: Option<ReviewConfig>,
    pub warnings: Vec<String>,
}

pub fn config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "adopr")
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<ConfigLoadOutcome> {
    let path = config_path()?;
    load_config_from_path(&path)
}

pub fn load_config_from_path(path: &Path) -> Result<ConfigLoadOutcome> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ConfigLoadOutcome::default()),
        Err(err) => return Err(err.into()),
    };

    let value: Value = toml::from_str(&contents)?;
    let table = value
        .as_table()
        .ok_or_else(|| anyhow!("Config root must be a TOML table"))?;

    let mut config = ReviewConfig::default();
    let mut warnings = Vec::new();

    for (key, slot) in [
        ("collection", &mut config.collection_url),
        ("access-token", &mut config.access_token),
        ("project", &mut config.project),
        ("repository", &mut config.repository),
    ] {
        if let Some(raw) = table.get(key) {
            if let Some(text) = raw.as_str() {
                *slot = Some(text.to_string());
            } else {
                warnings.push(format!(
                    "Warning: Config key '{key}' must be a string; ignoring value"
                ));
            }
        }
    }

    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warnings.push(format!("Warning: Unknown config key '{key}', ignoring"));
        }
    }

    Ok(ConfigLoadOutcome {
        config: Some(config),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn should_return_none_when_config_file_missing() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        let outcome = load_config_from_path(&path).expect("missing config should not fail");
        assert_eq!(outcome.config, None);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn should_load_all_known_keys() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
collection = "https://dev.azure.com/fabrikam"
access-token = "pat"
project = "Website"
repository = "website-app"
"#,
        )
        .unwrap();

        let outcome = load_config_from_path(&path).unwrap();
        let config = outcome.config.unwrap();
        assert_eq!(
            config.collection_url.as_deref(),
            Some("https://dev.azure.com/fabrikam")
        );
        assert_eq!(config.repository.as_deref(), Some("website-app"));
        assert!(config.is_complete());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn should_warn_on_unknown_key() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "collection = \"url\"\ncolour = \"blue\"\n").unwrap();

        let outcome = load_config_from_path(&path).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("colour"));
    }

    #[test]
    fn should_warn_and_ignore_non_string_value() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "project = 7\n").unwrap();

        let outcome = load_config_from_path(&path).unwrap();
        let config = outcome.config.unwrap();
        assert_eq!(config.project, None);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn incomplete_config_is_reported() {
        let config = ReviewConfig {
            collection_url: Some("url".to_string()),
            ..ReviewConfig::default()
        };
        assert!(!config.is_complete());
    }
}
