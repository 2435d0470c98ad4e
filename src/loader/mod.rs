use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub const DEFAULT_LOCAL_SOURCE: &str = "./data/";
pub const DEFAULT_REMOTE_SOURCE: &str = "https://iepaltohospicio.site/data/";

pub fn default_sources() -> Vec<String> {
    vec![
        DEFAULT_LOCAL_SOURCE.to_string(),
        DEFAULT_REMOTE_SOURCE.to_string(),
    ]
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid source URL {base}{name}: {reason}")]
    InvalidUrl {
        base: String,
        name: String,
        reason: String,
    },

    #[error("request failed: {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON from {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Http(reqwest::Url),
    Dir(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` bases are fetched remotely, anything else is
    /// a directory on disk.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if let Ok(url) = reqwest::Url::parse(trimmed) {
            if matches!(url.scheme(), "http" | "https") {
                return Self::Http(with_trailing_slash(url));
            }
        }
        Self::Dir(crate::config::expand_tilde(trimmed))
    }

    pub fn candidate(&self, name: &str, bust: &CacheBust) -> Result<String, LoadError> {
        match self {
            Self::Http(base) => {
                let mut url = base.join(name).map_err(|e| LoadError::InvalidUrl {
                    base: base.to_string(),
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
                url.set_query(Some(bust.as_str()));
                Ok(url.to_string())
            }
            Self::Dir(dir) => Ok(dir.join(name).to_string_lossy().to_string()),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

fn with_trailing_slash(mut url: reqwest::Url) -> reqwest::Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Query token that keeps intermediate caches from serving stale data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheBust(String);

impl CacheBust {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis().to_string())
    }

    pub fn fixed(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::CACHE_CONTROL,
        reqwest::header::HeaderValue::from_static("no-cache"),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_seconds.max(1)))
        .build()
}

/// Ordered list of places a data file may live. The first source that
/// answers with a parseable body wins.
#[derive(Clone, Debug)]
pub struct SourceResolver {
    client: reqwest::Client,
    sources: Vec<DataSource>,
    bust: CacheBust,
}

impl SourceResolver {
    pub fn new(client: reqwest::Client, sources: Vec<DataSource>, bust: CacheBust) -> Self {
        Self {
            client,
            sources,
            bust,
        }
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn candidates(&self, name: &str) -> Vec<String> {
        self.sources
            .iter()
            .filter_map(|s| s.candidate(name, &self.bust).ok())
            .collect()
    }

    /// Never fails: every transport, status or parse problem moves on to the
    /// next source, and `None` means no source had the file.
    pub async fn fetch<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        for source in self.sources.iter() {
            match self.fetch_from(source, name).await {
                Ok(value) => {
                    tracing::debug!(%source, name, "loaded data file");
                    return Some(value);
                }
                Err(e) => {
                    tracing::debug!(%source, name, error = %e, "data source failed, trying next");
                }
            }
        }
        tracing::warn!(name, "no data source could provide file");
        None
    }

    async fn fetch_from<T: DeserializeOwned>(
        &self,
        source: &DataSource,
        name: &str,
    ) -> Result<T, LoadError> {
        let location = source.candidate(name, &self.bust)?;
        let body = match source {
            DataSource::Http(_) => {
                let resp = self.client.get(&location).send().await.map_err(|e| {
                    LoadError::Transport {
                        url: location.clone(),
                        source: e,
                    }
                })?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: location,
                        status: status.as_u16(),
                    });
                }
                resp.bytes()
                    .await
                    .map_err(|e| LoadError::Transport {
                        url: location.clone(),
                        source: e,
                    })?
                    .to_vec()
            }
            DataSource::Dir(_) => {
                tokio::fs::read(&location)
                    .await
                    .map_err(|e| LoadError::Io {
                        path: location.clone(),
                        source: e,
                    })?
            }
        };
        serde_json::from_slice::<T>(&body).map_err(|e| LoadError::Parse {
            location,
            source: e,
        })
    }
}
