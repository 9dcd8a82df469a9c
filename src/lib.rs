pub mod models;
pub mod services;
pub mod api;

use anyhow::{anyhow, Context};
use services::{AppConfig, Classifier, ConfigStore, Detector, HttpClassifier};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "code_detective_";
const LOG_FILES_KEPT: usize = 30;

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

/// Initialize logging: console plus one log file per process.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if env_flag("CODE_DETECTIVE_DISABLE_FILE_LOG") {
        init_console_only_logging(env_filter);
        info!("File logging disabled via CODE_DETECTIVE_DISABLE_FILE_LOG");
        return;
    }

    let logs_dir = match std::env::var("CODE_DETECTIVE_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        info!("Falling back to console-only logging (log dir not writable)");
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("{}{}.log", LOG_FILE_PREFIX, timestamp);

    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    info!("=== Code Detective Started ===");
    info!("Log file: {}/{}", logs_dir.display(), log_filename);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if !env_flag("CODE_DETECTIVE_DISABLE_LOG_CLEANUP") {
        std::thread::spawn(move || {
            cleanup_old_logs(&logs_dir, LOG_FILES_KEPT);
        });
    }
}

fn get_logs_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("logs")
    }

    #[cfg(not(debug_assertions))]
    {
        if let Some(data_dir) = dirs::data_local_dir() {
            return data_dir.join("code-detective").join("logs");
        }
        PathBuf::from("logs")
    }
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn config_store(args: &[String]) -> anyhow::Result<ConfigStore> {
    match parse_arg_value(args, "--config") {
        Some(path) => Ok(ConfigStore::from_file(PathBuf::from(path))),
        None => ConfigStore::default_config_dir()
            .map(ConfigStore::new)
            .ok_or_else(|| anyhow!("no platform config directory; pass --config <path>")),
    }
}

fn build_detector(config: &AppConfig, runtime: tokio::runtime::Handle) -> anyhow::Result<Detector> {
    let endpoint = &config.classifiers.origin;
    let origin: Arc<dyn Classifier> = Arc::new(
        HttpClassifier::new(
            "origin",
            endpoint.url.clone(),
            endpoint.api_key.clone(),
            Duration::from_secs(endpoint.timeout_secs),
            runtime.clone(),
        )
        .context("building origin classifier client")?,
    );

    let endpoint = &config.classifiers.family;
    let family: Arc<dyn Classifier> = Arc::new(
        HttpClassifier::new(
            "family",
            endpoint.url.clone(),
            endpoint.api_key.clone(),
            Duration::from_secs(endpoint.timeout_secs),
            runtime,
        )
        .context("building model-family classifier client")?,
    );

    info!(
        origin_url = %config.classifiers.origin.url,
        family_url = %config.classifiers.family.url,
        "classifiers.configured"
    );
    Ok(Detector::new(origin, family))
}

/// Process entry point: `code-detective [--config <path>] [--init-config]`.
pub fn run() -> anyhow::Result<()> {
    PROCESS_START.get_or_init(Instant::now);
    let args: Vec<String> = std::env::args().collect();

    let store = config_store(&args)?;
    if has_flag(&args, "--init-config") {
        store.save(&AppConfig::default()).map_err(|e| anyhow!(e))?;
        println!("Wrote default config to {}", store.config_file().display());
        return Ok(());
    }

    init_logging();
    info!(startup_ms = startup_elapsed_ms(), "logging.initialized");

    let mut config = store.load().map_err(|e| anyhow!(e))?;
    config.apply_env_overrides();
    info!(config_file = %store.config_file().display(), "config.loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let detector = Arc::new(build_detector(&config, runtime.handle().clone())?);
    let max_concurrency = config.batch.max_concurrency;

    runtime.block_on(api::serve(&config.server, detector, max_concurrency))?;

    info!("=== Code Detective Exited ===");
    Ok(())
}
