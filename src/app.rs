use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::countdown;
use crate::loader;
use crate::output::{self, OutputFormat, Section};
use crate::runner::{Options, Runner};

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    sources: Vec<String>,
    timeout: u64,
    query: String,
    page: usize,
    floor: Option<i64>,
    sections: Vec<Section>,
    event_start: DateTime<Local>,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    verbose: u8,
}

impl RunConfig {
    fn runner_options(&self) -> Options {
        Options {
            sources: self.sources.clone(),
            timeout_seconds: self.timeout,
            query: self.query.clone(),
            page: self.page,
            floor: self.floor,
            event_start: Some(self.event_start),
        }
    }
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let timeout = args.timeout.or(cfg.timeout).unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let page = args.page.or(cfg.page).unwrap_or(1);
    if page == 0 {
        return Err("invalid page, expected positive integer".to_string());
    }
    let query = args.query.or(cfg.query).unwrap_or_default();
    let floor = args.floor.or(cfg.floor);

    let sources = if !args.source.is_empty() {
        args.source
    } else {
        cfg.sources.unwrap_or_else(loader::default_sources)
    };
    let sources = crate::utils::clean_sources(sources);
    if sources.is_empty() {
        return Err("at least one data source is required (--source)".to_string());
    }

    let sections_raw = if !args.section.is_empty() {
        args.section
    } else {
        cfg.sections.unwrap_or_default()
    };
    let sections = crate::utils::collect_sections(&sections_raw)
        .map_err(|e| format!("invalid sections: {e}"))?;

    let event_start_raw = args
        .event_start
        .or(cfg.event_start)
        .unwrap_or_else(|| countdown::DEFAULT_EVENT_START.to_string());
    let event_start = countdown::parse_event_start(&event_start_raw)
        .map_err(|e| format!("invalid event start '{event_start_raw}': {e}"))?;

    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde_string(&p));
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        sources,
        timeout,
        query,
        page,
        floor,
        sections,
        event_start,
        output,
        output_format,
        no_color,
        verbose: args.verbose,
    })
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color || run.output.is_some() {
        colored::control::set_override(false);
    }

    let runner = Runner::new(run.runner_options()).map_err(|e| e.to_string())?;
    if run.output.is_some() {
        format_kv_line("Sources", &run.sources.join(" "));
        format_kv_line(
            "View",
            &format!(
                "query={} page={} floor={} format={:?}",
                if run.query.is_empty() { "-" } else { run.query.as_str() },
                run.page,
                run.floor
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "all".to_string()),
                run.output_format
            ),
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    pb.set_message("Cargando datos...");

    let started_at = Instant::now();
    let dashboard = runner.run().await;
    pb.finish_and_clear();

    if !dashboard.availability.dashboard {
        tracing::warn!("dashboard.json unavailable from every source");
    }

    let rendered = output::render(&dashboard, &run.sections, run.output_format);

    match run.output.as_ref() {
        Some(outfile_path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(outfile_path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            eprintln!(
                ":: Completed :: {} written in {}ms ::",
                outfile_path,
                started_at.elapsed().as_millis()
            );
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }

    Ok(())
}

fn init_config(path: Option<PathBuf>) -> Result<(), String> {
    let path = path
        .or_else(config::default_config_path)
        .ok_or_else(|| "unable to determine home directory for default config".to_string())?;
    let created = config::ensure_default_config_file(&path).map_err(|e| e.to_string())?;
    if created {
        println!("{} {}", "Created".green(), path.display());
    } else {
        println!("{} {}", "Exists".yellow(), path.display());
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        return init_config(user_config_path);
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false).map_err(|e| e.to_string())?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true).map_err(|e| e.to_string())?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    tracing::debug!(
        sources = run.sources.len(),
        timeout = run.timeout,
        verbose = run.verbose,
        "configuration resolved"
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_use_builtin_sources_and_first_page() {
        let args = CliArgs::parse_from(["eventboard"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.sources, loader::default_sources());
        assert_eq!(run.page, 1);
        assert_eq!(run.timeout, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(run.sections, Section::ALL.to_vec());
        assert_eq!(run.output_format, OutputFormat::Text);
        assert!(run.floor.is_none());
    }

    #[test]
    fn cli_values_override_config() {
        let args = CliArgs::parse_from(["eventboard", "-q", "rojas", "-p", "3", "-s", "./mine/"]);
        let cfg = ConfigFile {
            query: Some("perez".to_string()),
            page: Some(2),
            floor: Some(2),
            sources: Some(vec!["https://cfg.example/data/".to_string()]),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.query, "rojas");
        assert_eq!(run.page, 3);
        assert_eq!(run.floor, Some(2));
        assert_eq!(run.sources, vec!["./mine/".to_string()]);
    }

    #[test]
    fn output_format_inferred_from_extension() {
        let args = CliArgs::parse_from(["eventboard", "-o", "panel.html"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.output_format, OutputFormat::Html);

        let args = CliArgs::parse_from(["eventboard", "-o", "panel.html", "-A", "json"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.output_format, OutputFormat::Json);
    }

    #[test]
    fn sections_can_come_from_config() {
        let args = CliArgs::parse_from(["eventboard"]);
        let cfg = ConfigFile {
            sections: Some(vec!["tables".to_string(), "summary".to_string()]),
            ..Default::default()
        };
        let run = build_run_config(args, cfg).unwrap();
        assert_eq!(run.sections, vec![Section::Tables, Section::Summary]);
    }

    #[test]
    fn zero_page_is_rejected() {
        let args = CliArgs::parse_from(["eventboard", "-p", "0"]);
        assert!(build_run_config(args, ConfigFile::default()).is_err());

        let args = CliArgs::parse_from(["eventboard"]);
        let cfg = ConfigFile {
            page: Some(0),
            ..Default::default()
        };
        assert!(build_run_config(args, cfg).is_err());
    }

    #[test]
    fn bad_event_start_is_rejected() {
        let args = CliArgs::parse_from(["eventboard", "--event-start", "mañana"]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert!(err.contains("invalid event start 'mañana'"));

        let args = CliArgs::parse_from(["eventboard"]);
        let cfg = ConfigFile {
            event_start: Some("pronto".to_string()),
            ..Default::default()
        };
        assert!(build_run_config(args, cfg).is_err());
    }

    #[test]
    fn merged_values_are_checked_once() {
        let args = CliArgs::parse_from(["eventboard", "-T", "0"]);
        let err = build_run_config(args, ConfigFile::default()).unwrap_err();
        assert_eq!(err, "invalid timeout, expected positive integer");

        let args = CliArgs::parse_from(["eventboard"]);
        let cfg = ConfigFile {
            output_format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(build_run_config(args, cfg).unwrap_err().contains("invalid output format"));

        let args = CliArgs::parse_from(["eventboard", "--section", "tables,galeria"]);
        assert!(build_run_config(args, ConfigFile::default())
            .unwrap_err()
            .contains("invalid sections"));
    }

    #[test]
    fn negative_floor_parses() {
        let args = CliArgs::parse_from(["eventboard", "--floor", "-1"]);
        let run = build_run_config(args, ConfigFile::default()).unwrap();
        assert_eq!(run.floor, Some(-1));
    }
}
