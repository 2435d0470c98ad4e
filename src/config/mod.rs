use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{path}'")]
    NotFound { path: String },

    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config path '{path}'")]
    InvalidPath { path: String },

    #[error("failed to write config '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub sources: Option<Vec<String>>,
    pub timeout: Option<u64>,
    pub query: Option<String>,
    pub page: Option<usize>,
    pub floor: Option<i64>,
    pub sections: Option<Vec<String>>,
    pub event_start: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".eventboard").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            serde_yaml::from_str::<ConfigFile>(&contents).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                source: e,
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn default_config_yaml() -> String {
    r#"# eventboard config
#
# Location (default):
#   ~/.eventboard/config.yml

# Data sources, tried in order. Plain paths are directories on disk,
# http(s) URLs are fetched with a cache-busting query token.
sources:
  - ./data/
  - https://iepaltohospicio.site/data/

# Per-request timeout in seconds
timeout: 10

# Visitor directory
# query: ""
page: 1

# Seating: show a single floor (falls back to every table when empty)
# floor: 1

# Sections to render: summary, visitors, families, tables, contacts, charts
# sections: [summary, visitors, tables]

# Countdown target (local time)
event_start: "2025-10-31T09:00:00"

# Output (optional)
# output: ./dashboard.html
# output_format: html

no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path.parent().ok_or_else(|| ConfigError::InvalidPath {
        path: path.display().to_string(),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
        path: parent.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, default_config_yaml()).map_err(|e| ConfigError::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.sources.unwrap().len(), 2);
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.page, Some(1));
        assert_eq!(cfg.no_color, Some(false));
    }

    #[test]
    fn missing_file_is_allowed_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(matches!(
            load_config(&path, false),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn ensure_default_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.event_start.as_deref(), Some("2025-10-31T09:00:00"));
    }

    #[test]
    fn invalid_yaml_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "timeout: [not a number").unwrap();
        assert!(matches!(
            load_config(&path, false),
            Err(ConfigError::Parse { .. })
        ));
    }
}
