use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::time::Instant;

use crate::dashboard::{self, Dashboard, LoadedData, ViewOptions};
use crate::loader::{self, CacheBust, DataSource, SourceResolver};
use crate::model::{DashboardDoc, FullDump, VisitorList, DASHBOARD_FILE, FULL_DUMP_FILE, VISITORS_FILE};

#[derive(Clone, Debug)]
pub struct Options {
    pub sources: Vec<String>,
    pub timeout_seconds: u64,
    pub query: String,
    pub page: usize,
    pub floor: Option<i64>,
    pub event_start: Option<DateTime<Local>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sources: loader::default_sources(),
            timeout_seconds: 10,
            query: String::new(),
            page: 1,
            floor: None,
            event_start: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no data sources configured")]
    NoSources,

    #[error("invalid page {value}, expected positive integer")]
    InvalidPage { value: usize },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    resolver: SourceResolver,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        Self::with_cache_bust(options, CacheBust::now())
    }

    pub fn with_cache_bust(options: Options, bust: CacheBust) -> Result<Self, RunnerError> {
        let sources: Vec<DataSource> = crate::utils::clean_sources(options.sources.clone())
            .iter()
            .map(|s| DataSource::parse(s))
            .collect();
        if sources.is_empty() {
            return Err(RunnerError::NoSources);
        }
        if options.page == 0 {
            return Err(RunnerError::InvalidPage {
                value: options.page,
            });
        }
        let client = loader::build_client(options.timeout_seconds)
            .map_err(|e| RunnerError::HttpClientBuild { source: e })?;
        Ok(Self {
            resolver: SourceResolver::new(client, sources, bust),
            options,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// Fetches the three documents concurrently; each one that no source
    /// can provide is left as `None`.
    pub async fn load(&self) -> LoadedData {
        let started_at = Instant::now();
        let (dashboard, visitors, full) = tokio::join!(
            self.resolver.fetch::<DashboardDoc>(DASHBOARD_FILE),
            self.resolver.fetch::<VisitorList>(VISITORS_FILE),
            self.resolver.fetch::<FullDump>(FULL_DUMP_FILE),
        );
        tracing::info!(
            dashboard = dashboard.is_some(),
            visitors = visitors.is_some(),
            contacts = full.is_some(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "data load finished"
        );
        LoadedData {
            dashboard,
            visitors,
            full,
        }
    }

    pub async fn run(&self) -> Dashboard {
        let data = self.load().await;
        let view = ViewOptions {
            query: self.options.query.clone(),
            page: self.options.page,
            floor: self.options.floor,
        };
        dashboard::build_dashboard(&data, &view, self.options.event_start, Local::now())
    }
}
